//! Wizard steps and the field-to-step ownership table.

use std::collections::BTreeSet;

use serde::Serialize;

/// Ordered pages of the problem wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProblemStep {
    GeneralInfo,
    Description,
    Constraints,
    TestCases,
    SolutionAndHints,
}

impl ProblemStep {
    pub const ALL: [ProblemStep; 5] = [
        Self::GeneralInfo,
        Self::Description,
        Self::Constraints,
        Self::TestCases,
        Self::SolutionAndHints,
    ];

    /// Zero-based position in the wizard
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::GeneralInfo => "General Info",
            Self::Description => "Description",
            Self::Constraints => "Constraints",
            Self::TestCases => "Test Cases",
            Self::SolutionAndHints => "Solution & Hints",
        }
    }
}

/// Which step owns each form field
pub const PROBLEM_FIELD_STEPS: &[(&str, ProblemStep)] = &[
    ("title", ProblemStep::GeneralInfo),
    ("difficulty", ProblemStep::GeneralInfo),
    ("visibility", ProblemStep::GeneralInfo),
    ("problem_type", ProblemStep::GeneralInfo),
    ("topics", ProblemStep::GeneralInfo),
    ("tags", ProblemStep::GeneralInfo),
    ("description", ProblemStep::Description),
    ("input_description", ProblemStep::Description),
    ("output_description", ProblemStep::Description),
    ("constraints", ProblemStep::Constraints),
    ("time_limit_ms", ProblemStep::Constraints),
    ("memory_limit_mb", ProblemStep::Constraints),
    ("max_score", ProblemStep::Constraints),
    ("testcase_file", ProblemStep::TestCases),
    ("sample_testcases", ProblemStep::TestCases),
    ("official_solution_content", ProblemStep::SolutionAndHints),
    ("hints", ProblemStep::SolutionAndHints),
];

/// Map failing field names to the set of steps owning them.
///
/// Fields missing from `table` are logged and ignored.
pub fn flag_steps<S, I, F>(table: &[(&str, S)], failing_fields: I) -> BTreeSet<S>
where
    S: Copy + Ord,
    I: IntoIterator<Item = F>,
    F: AsRef<str>,
{
    failing_fields
        .into_iter()
        .filter_map(|field| {
            let field = field.as_ref();
            let step = table
                .iter()
                .find(|(name, _)| *name == field)
                .map(|(_, step)| *step);
            if step.is_none() {
                tracing::debug!(field, "validation error on a field without an owning step");
            }
            step
        })
        .collect()
}
