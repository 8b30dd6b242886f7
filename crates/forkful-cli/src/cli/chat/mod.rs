//! Interactive CLI chat experience for Forkful.
//!
//! This module implements the chat loop: optimistic transcript updates,
//! markdown rendering of replies, restaurant cards, follow-up suggestions,
//! location controls, and slash commands. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
