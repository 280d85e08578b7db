use std::env;

// Fixes the deepest debug depth that `debug_at!` call sites compile in.
// Unset means zero: every tiered debug call is compiled out.
fn main() {
    println!("cargo:rerun-if-env-changed=LOG_MAX_DEBUG");

    let depth = match env::var("LOG_MAX_DEBUG") {
        Ok(raw) => {
            let trimmed = raw.trim();
            match trimmed.parse::<u16>() {
                Ok(depth) => depth,
                Err(_) => {
                    println!(
                        "cargo:warning=ignoring LOG_MAX_DEBUG={trimmed:?}: expected a non-negative integer"
                    );
                    0
                }
            }
        }
        Err(_) => 0,
    };

    println!("cargo:rustc-env=LOGGING_MAX_DEBUG_DEPTH={depth}");
}
