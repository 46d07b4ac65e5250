use std::fmt;

use colored::Colorize;

use crate::lexer::LexerToken;

use super::{ExecutionProfile, LoopStats};

/// The two ranked loop tables plus the flat per-token counter dump,
/// projected from a finished profile. Built only after a run terminates
/// normally; a run that died mid-way has nothing to report.
#[derive(Debug, Clone)]
pub struct ProfileReport {
    pub simple_loops: Vec<LoopStats>,
    pub general_loops: Vec<LoopStats>,
    pub instruction_counts: Vec<(usize, char, u64)>,
}

impl ProfileReport {
    /// Rank both loop tables by entry count descending. The loop records
    /// arrive position-ascending, so the stable sort leaves ties in
    /// position order.
    pub fn from_profile(tokens: &[LexerToken], profile: &ExecutionProfile) -> ProfileReport {
        let mut simple_loops: Vec<LoopStats> = vec![];
        let mut general_loops: Vec<LoopStats> = vec![];
        for stats in profile.loops() {
            if stats.simple {
                simple_loops.push(stats.clone());
            } else {
                general_loops.push(stats.clone());
            }
        }
        simple_loops.sort_by(|a, b| b.entries.cmp(&a.entries));
        general_loops.sort_by(|a, b| b.entries.cmp(&a.entries));

        let instruction_counts = tokens
            .iter()
            .zip(profile.counts())
            .enumerate()
            .map(|(position, (token, count))| (position, token.kind.as_char(), *count))
            .collect();

        ProfileReport {
            simple_loops,
            general_loops,
            instruction_counts,
        }
    }
}

fn write_loop_table(f: &mut fmt::Formatter<'_>, title: &str, loops: &[LoopStats]) -> fmt::Result {
    writeln!(f, "{}", title.blue().bold())?;
    writeln!(f, "{:>8}  {:>10}  body", "start", "entries")?;
    for stats in loops {
        writeln!(f, "{:>8}  {:>10}  [{}]", stats.open, stats.entries, stats.body)?;
    }
    Ok(())
}

impl fmt::Display for ProfileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_loop_table(f, "Simple loops", &self.simple_loops)?;
        writeln!(f)?;
        write_loop_table(f, "Non-simple loops", &self.general_loops)?;
        writeln!(f)?;
        writeln!(f, "{}", "Instruction counts".blue().bold())?;
        writeln!(f, "{:>8}  op  {:>10}", "index", "count")?;
        for (position, op, count) in &self.instruction_counts {
            writeln!(f, "{:>8}   {}  {:>10}", position, op, count)?;
        }
        Ok(())
    }
}
