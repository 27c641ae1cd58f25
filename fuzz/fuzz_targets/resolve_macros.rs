#![no_main]

use faceplate_macros::{contains_macros, parse_definition, resolve, Macros};
use libfuzzer_sys::fuzz_target;

const MAX_INPUT_BYTES: usize = 4096;

fn decode_input(bytes: &[u8]) -> String {
    let capped = &bytes[..bytes.len().min(MAX_INPUT_BYTES)];
    String::from_utf8_lossy(capped).into_owned()
}

fn fixed_scope() -> Macros {
    let mut macros = Macros::new();
    macros.add("S", "BL7");
    macros.add("NAME", "Flint, Eugene");
    macros.add("NEST", "$(S):flow");
    macros.add("LOOP", "$(LOOP)");
    macros
}

fuzz_target!(|data: &[u8]| {
    let input = decode_input(data);
    let scope = fixed_scope();

    // Must terminate, and may only fail with the recursion guard.
    let resolved = resolve(&scope, &input);

    if !input.contains('$') {
        assert_eq!(resolved.as_deref(), Ok(input.as_str()));
        assert!(!contains_macros(&input));
    }

    // The definition parser must never panic either; when it accepts
    // the input, resolving against the result must still terminate.
    if let Ok(parsed) = parse_definition(&input) {
        let _ = resolve(&parsed, &input);
    }
});
