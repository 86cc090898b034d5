mod common;
mod reason;
