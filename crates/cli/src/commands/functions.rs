//! List the function catalog.

use stockline_core::functions::{all_functions, servers};

/// Print every server and its functions, or just the function names.
pub fn list(names_only: bool) {
    if names_only {
        let names: Vec<String> = all_functions().into_iter().map(|f| f.name).collect();
        super::print_json(&names);
    } else {
        super::print_json(&servers());
    }
}
