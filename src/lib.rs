// Library exports for the DeepBox player
// This allows the server, the coordinator client and the replay tool to share the engines

pub mod alphabeta;
pub mod board;
pub mod bot;
pub mod canonical;
pub mod client;
pub mod config;
pub mod debug_logger;
pub mod endgame;
pub mod graph;
pub mod mcts;
pub mod replay;
pub mod simple_profiler;
pub mod strategy;
pub mod types;
