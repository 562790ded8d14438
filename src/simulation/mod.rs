pub mod rate_network;
