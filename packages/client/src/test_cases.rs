//! Static list of manual test cases.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestCaseStatus {
    Passed,
    Failed,
    Pending,
}

impl TestCaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestCaseStatus::Passed => "passed",
            TestCaseStatus::Failed => "failed",
            TestCaseStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for TestCaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub id: &'static str,
    pub title: &'static str,
    pub steps: &'static [&'static str],
    pub expected_result: &'static str,
    pub status: TestCaseStatus,
    /// Serial number of a related bug
    pub related_bug: Option<&'static str>,
    pub notes: Option<&'static str>,
}

static TEST_CASES: [TestCase; 3] = [
    TestCase {
        id: "1",
        title: "Login Functionality - Valid Credentials",
        steps: &[
            "Navigate to login page",
            "Enter valid email",
            "Enter valid password",
            "Click login button",
        ],
        expected_result: "User should be successfully logged in and redirected to dashboard",
        status: TestCaseStatus::Passed,
        related_bug: None,
        notes: None,
    },
    TestCase {
        id: "2",
        title: "Bug Report Creation",
        steps: &[
            "Navigate to create bug page",
            "Fill in all required fields",
            "Upload screenshot",
            "Submit form",
        ],
        expected_result: "New bug should be created and user redirected to bug details page",
        status: TestCaseStatus::Pending,
        related_bug: None,
        notes: None,
    },
    TestCase {
        id: "3",
        title: "Mobile Menu Navigation",
        steps: &[
            "Open application on mobile device",
            "Click hamburger menu",
            "Navigate through all menu items",
            "Close menu",
        ],
        expected_result: "Menu should open, allow navigation, and close properly",
        status: TestCaseStatus::Failed,
        related_bug: Some("5"),
        notes: Some("Menu cannot be closed once opened"),
    },
];

pub fn test_cases() -> &'static [TestCase] {
    &TEST_CASES
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestCaseFilter {
    #[default]
    All,
    Only(TestCaseStatus),
}

impl TestCaseFilter {
    pub fn matches(&self, case: &TestCase) -> bool {
        match self {
            TestCaseFilter::All => true,
            TestCaseFilter::Only(status) => case.status == *status,
        }
    }

    pub fn apply(&self) -> Vec<&'static TestCase> {
        test_cases().iter().filter(|c| self.matches(c)).collect()
    }
}

impl FromStr for TestCaseFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TestCaseFilter::All),
            "passed" => Ok(TestCaseFilter::Only(TestCaseStatus::Passed)),
            "failed" => Ok(TestCaseFilter::Only(TestCaseStatus::Failed)),
            "pending" => Ok(TestCaseFilter::Only(TestCaseStatus::Pending)),
            other => Err(format!(
                "unknown filter '{}', expected all, passed, failed or pending",
                other
            )),
        }
    }
}
