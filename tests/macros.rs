//! Test harness shared by every file under `tests/`. `test!` compiles
//! `$input` and asserts the rendered CSS equals `$output`; `error!`
//! compiles `$input` and asserts it fails with `$output` as the first line
//! of the formatted error block (`spec.md` §7's "Error: <message>").
//!
//! Each integration test file brings these in with `#[macro_use] mod macros;`,
//! the way the teacher's own retrieved fragments expect a sibling
//! `macros.rs` to already exist.

#![allow(dead_code)]

use grasswood::{compile_string, Options};

pub fn compile(input: &str) -> Result<String, String> {
    compile_string(input, Options::new()).map(|r| r.css)
}

macro_rules! test {
    ($(#[$attr:meta])* $name:ident, $input:expr, $output:expr) => {
        $(#[$attr])*
        #[test]
        fn $name() {
            match crate::macros::compile($input) {
                Ok(css) => assert_eq!(css, $output),
                Err(e) => panic!("expected successful compilation, got error:\n{}", e),
            }
        }
    };
}

macro_rules! error {
    ($(#[$attr:meta])* $name:ident, $input:expr, $output:expr) => {
        $(#[$attr])*
        #[test]
        fn $name() {
            match crate::macros::compile($input) {
                Ok(css) => panic!("expected a compile error, got CSS:\n{}", css),
                Err(e) => assert_eq!(e.lines().next().unwrap_or(""), $output),
            }
        }
    };
}
