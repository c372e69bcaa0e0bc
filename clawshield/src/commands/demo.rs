// clawshield/src/commands/demo.rs
//! The demo command: runs three embedded samples through the scanner and
//! checks that each lands on its expected verdict. Posting stays disabled so
//! the demo is safe to run anywhere.

use anyhow::{bail, Result};
use is_terminal::IsTerminal;

use clawshield_core::Verdict;

use crate::commands::scan::execute_scan;
use crate::output;

struct DemoCase {
    label: &'static str,
    expected: Verdict,
    content: &'static str,
}

const DEMO_CASES: &[DemoCase] = &[
    DemoCase {
        label: "Benign sample",
        expected: Verdict::Allow,
        content: include_str!("../../samples/benign.txt"),
    },
    DemoCase {
        label: "Ambiguous sample",
        expected: Verdict::Sanitize,
        content: include_str!("../../samples/ambiguous.txt"),
    },
    DemoCase {
        label: "Malicious sample",
        expected: Verdict::Block,
        content: include_str!("../../samples/malicious.txt"),
    },
];

fn run_demo_case(case: &DemoCase, colored: bool) -> Result<bool> {
    let input = vec![format!("text:{}", case.content)];
    let execution = execute_scan(&input, None, false)?;
    let ok = execution.receipt.verdict == case.expected;

    println!(
        "\n[{}] {} => {} (expected {})",
        if ok { "PASS" } else { "FAIL" },
        case.label,
        execution.receipt.verdict,
        case.expected
    );
    println!(
        "{}",
        output::format_human_output(&execution.receipt, &execution.notes, colored)?
    );
    Ok(ok)
}

/// Entry point for `clawshield demo`.
pub fn run() -> Result<()> {
    let colored = std::io::stdout().is_terminal();
    let mut passed = true;
    for case in DEMO_CASES {
        passed &= run_demo_case(case, colored)?;
    }

    if !passed {
        bail!("demo verdicts did not match expectations");
    }
    Ok(())
}
