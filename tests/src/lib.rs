#![cfg(test)]

mod discovery;
mod support;
mod tunnel;
