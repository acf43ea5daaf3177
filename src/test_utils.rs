#[cfg(test)]
pub mod fixtures {
    use crate::aggregator::ResultCollector;
    use crate::output::MemorySink;
    use crate::types::License;

    pub fn mit() -> License {
        License::new("MIT", "MIT")
    }

    pub fn apache() -> License {
        License::new("Apache License 2.0", "Apache-2.0")
    }

    pub fn collector_with_memory_sink() -> (ResultCollector, MemorySink) {
        let sink = MemorySink::new();
        (ResultCollector::new(sink.clone()), sink)
    }
}
