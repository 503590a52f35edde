//! Environment variable based runtime configuration.
//!
//! ## Environment Variables
//!
//! ### `JOBRELAY_STACK_SIZE`
//!
//! Stack size for the coordination coroutine, in decimal (`65536`) or hex
//! (`0x10000`). Default: `0x10000` (64 KB). Decision routers that consult
//! configuration or registries need more stack than a plain I/O handler;
//! shrink this only if your router is trivial.

use std::env;

const DEFAULT_STACK_SIZE: usize = 0x10000; // 64 KB

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Stack size for the coordination coroutine in bytes.
    pub stack_size: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        RuntimeConfig {
            stack_size: parse_stack_size(env::var("JOBRELAY_STACK_SIZE").ok()),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

fn parse_stack_size(raw: Option<String>) -> usize {
    match raw {
        Some(val) => {
            if let Some(hex) = val.strip_prefix("0x") {
                usize::from_str_radix(hex, 16).unwrap_or(DEFAULT_STACK_SIZE)
            } else {
                val.parse().unwrap_or(DEFAULT_STACK_SIZE)
            }
        }
        None => DEFAULT_STACK_SIZE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!(parse_stack_size(Some("32768".to_string())), 32768);
        assert_eq!(parse_stack_size(Some("0x8000".to_string())), 0x8000);
    }

    #[test]
    fn falls_back_on_garbage_or_absence() {
        assert_eq!(parse_stack_size(Some("lots".to_string())), DEFAULT_STACK_SIZE);
        assert_eq!(parse_stack_size(None), DEFAULT_STACK_SIZE);
    }
}
