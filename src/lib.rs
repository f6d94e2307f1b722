#![warn(clippy::pedantic)]

//! Event-catalog dashboard split across two components composed over HTTP: a
//! credential-injecting proxy ([`proxy`]) in front of the Ticketmaster
//! Discovery API, and a client ([`client`]) that searches the catalog,
//! enriches each hit with a throttled per-event detail call, and derives the
//! table, chart, and CSV views ([`view`], [`export`]).

pub mod client;
pub mod config;
pub mod export;
pub mod geo;
pub mod model;
pub mod proxy;
pub mod view;
