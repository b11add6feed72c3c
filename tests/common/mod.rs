#![allow(dead_code)]

pub mod mock_transport;
pub mod pages;
