//! Stack-frame mechanics: the push/pop idiom, function prologue and
//! epilogue, and the addressing operand for a variable's [`Offset`].
//!
//! Kept as pure functions returning the instruction lines to emit,
//! rather than methods on the emitter, so the frame layout rules can be
//! read (and tested) independently of the rest of code generation.

use crate::analyze::symbol::Offset;

/// `sw`/`subu` pair. Every push is this exact two-instruction sequence;
/// the mirroring pop is [`pop`].
pub fn push(reg: &str) -> [String; 2] {
    [format!("sw {reg}, 0($sp)"), "subu $sp, $sp, 4".to_string()]
}

pub fn pop(reg: &str) -> [String; 2] {
    ["addu $sp, $sp, 4".to_string(), format!("lw {reg}, 0($sp)")]
}

/// `push $ra; push $fp; addu $fp, $sp, 8`, plus a `subu $sp, $sp,
/// size_locals` when the function has any locals at all.
pub fn prologue(size_locals: i32) -> Vec<String> {
    let mut lines = Vec::new();
    lines.extend(push("$ra"));
    lines.extend(push("$fp"));
    lines.push("addu $fp, $sp, 8".to_string());
    if size_locals > 0 {
        lines.push(format!("subu $sp, $sp, {size_locals}"));
    }
    lines
}

/// Restores `$ra`/`$fp`/`$sp` and either returns to the caller (`jr
/// $ra`) or, for `main`, exits via syscall 10.
pub fn epilogue(is_main: bool) -> Vec<String> {
    let mut lines = vec![
        "lw $ra, 0($fp)".to_string(),
        "move $t0, $fp".to_string(),
        "lw $fp, -4($fp)".to_string(),
        "move $sp, $t0".to_string(),
    ];
    if is_main {
        lines.push("li $v0, 10".to_string());
        lines.push("syscall".to_string());
    } else {
        lines.push("jr $ra".to_string());
    }
    lines
}

/// The `lw`/`sw` operand for a variable at `offset`, named `label` if
/// it's global.
///
/// `Offset::Field` never reaches here: a dot-access's address is
/// always resolved as its base's address (see `DESIGN.md` — field
/// offsets are reserved by name resolution but, per spec, not
/// consumed by the emitter).
pub fn operand(offset: Offset, label: &str) -> String {
    match offset {
        Offset::Global => format!("_{label}"),
        Offset::Frame(n) => format!("{n}($fp)"),
        Offset::Field(_) => unreachable!("field offsets are not addressed directly by the emitter"),
    }
}

/// The address-of operand (for `la`/`addu`, as used by `codeGenAddr`).
pub fn address_instruction(offset: Offset, label: &str) -> String {
    match offset {
        Offset::Global => format!("la $t0, _{label}"),
        Offset::Frame(n) => format!("addu $t0, $fp, {n}"),
        Offset::Field(_) => unreachable!("field offsets are not addressed directly by the emitter"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_pop_is_net_neutral_on_the_stack_pointer() {
        assert_eq!(push("$t0")[1], "subu $sp, $sp, 4");
        assert_eq!(pop("$t0")[0], "addu $sp, $sp, 4");
    }

    #[test]
    fn prologue_skips_the_locals_allocation_when_empty() {
        let lines = prologue(0);
        assert!(!lines.iter().any(|l| l.starts_with("subu $sp, $sp,")));
    }

    #[test]
    fn prologue_reserves_locals_when_present() {
        let lines = prologue(12);
        assert!(lines.contains(&"subu $sp, $sp, 12".to_string()));
    }

    #[test]
    fn main_epilogue_exits_instead_of_returning() {
        let lines = epilogue(true);
        assert!(lines.contains(&"li $v0, 10".to_string()));
        assert!(!lines.contains(&"jr $ra".to_string()));
    }

    #[test]
    fn non_main_epilogue_returns_to_caller() {
        let lines = epilogue(false);
        assert!(lines.contains(&"jr $ra".to_string()));
    }

    #[test]
    fn global_operand_uses_the_underscore_prefixed_label() {
        assert_eq!(operand(Offset::Global, "counter"), "_counter");
    }

    #[test]
    fn frame_operand_is_fp_relative() {
        assert_eq!(operand(Offset::Frame(-8), "x"), "-8($fp)");
    }
}
