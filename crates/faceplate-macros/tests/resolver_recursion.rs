//! Recursion guard behavior: cycles fail, skips are free.

use faceplate_macros::{resolve, MacroError, Macros, MAX_RECURSION};

#[test]
fn self_referential_macro_fails() {
    let mut macros = Macros::new();
    macros.add("S", "$(S)");
    let err = resolve(&macros, "Never ending $(S)").unwrap_err();
    assert!(err.to_string().to_lowercase().contains("recursive"));
    assert!(err.to_string().contains("Never ending $(S)"));
}

#[test]
fn mutual_cycle_fails() {
    let mut macros = Macros::new();
    macros.add("PING", "${PONG}");
    macros.add("PONG", "${PING}");
    assert!(matches!(
        resolve(&macros, "$(PING)"),
        Err(MacroError::Recursive(_))
    ));
}

#[test]
fn growing_cycle_fails() {
    // Each expansion doubles the references; must abort, not OOM.
    let mut macros = Macros::new();
    macros.add("X", "$(X)$(X)");
    assert!(matches!(
        resolve(&macros, "$(X)"),
        Err(MacroError::Recursive(_))
    ));
}

#[test]
fn deep_but_finite_chain_resolves() {
    // A chain of exactly MAX_RECURSION splices is still legal.
    let mut macros = Macros::new();
    for link in 0..MAX_RECURSION - 1 {
        macros.add(format!("A{link}"), format!("$(A{})", link + 1));
    }
    macros.add(format!("A{}", MAX_RECURSION - 1), "done");
    assert_eq!(resolve(&macros, "$(A0)").unwrap(), "done");
}

#[test]
fn many_unknown_references_do_not_hit_the_bound() {
    // Skips must not count as recursion: more syntactically valid but
    // unresolvable references than the bound allows splices.
    let empty = Macros::new();
    let mut input = String::new();
    for index in 0..MAX_RECURSION + 10 {
        input.push_str(&format!("$(UNKNOWN_{index}) "));
    }
    assert_eq!(resolve(&empty, &input).unwrap(), input);
}

#[test]
fn skips_and_splices_mix() {
    // Unresolvable references interleaved with real ones: the real
    // ones resolve, the rest stay, and the bound is untouched by skips.
    let mut macros = Macros::new();
    macros.add("S", "BL7");
    let mut input = String::new();
    for index in 0..40 {
        input.push_str(&format!("$(S)-$(MISSING_{index}) "));
    }
    let resolved = resolve(&macros, &input).unwrap();
    assert!(!resolved.contains("$(S)"));
    assert_eq!(resolved.matches("BL7-").count(), 40);
    assert_eq!(resolved.matches("$(MISSING_").count(), 40);
}
