pub mod fetcher;
pub mod monitor;
pub mod report;
pub mod rest;
pub mod rpc;
pub mod scanner;
