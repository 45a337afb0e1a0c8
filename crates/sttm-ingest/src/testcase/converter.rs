use sttm_model::TestCase;

use super::adapter::RawTestCase;

/// Turns adapter output into [`TestCase`]s, tagging referenced systems.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestCaseConverter;

impl TestCaseConverter {
    pub fn convert(&self, raw: Vec<RawTestCase>) -> Vec<TestCase> {
        raw.into_iter().map(|case| self.convert_case(case)).collect()
    }

    pub fn convert_case(&self, raw: RawTestCase) -> TestCase {
        let mut case = TestCase {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            precondition: raw.precondition,
            steps: raw.steps,
            referenced_systems: Vec::new(),
        };
        case.detect_referenced_systems();
        case
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sttm_model::TestStep;

    #[test]
    fn detects_systems_from_all_text() {
        let raw = RawTestCase {
            id: "TC-1".into(),
            name: "Vendor inbound".into(),
            steps: vec![TestStep::new(1, "Open NetSuite", "")],
            ..RawTestCase::default()
        };
        let case = TestCaseConverter.convert_case(raw);
        assert!(case.referenced_systems.contains(&"vendor".to_string()));
        assert!(case.referenced_systems.contains(&"netsuite".to_string()));
        assert!(case.referenced_systems.contains(&"inbound".to_string()));
    }
}
