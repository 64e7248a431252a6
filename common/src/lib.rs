pub mod proto {
    include!(concat!(env!("OUT_DIR"), "/tictactoe.rs"));
}

pub mod config;
pub mod logger;
pub mod tictactoe;
