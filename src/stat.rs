use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub expanded_nodes: usize,
    pub generated_nodes: usize,
    pub visited_states: usize,
    pub plan_length: usize,
    pub time_us: usize,
}

impl Stats {
    pub fn print(&self, puzzle: &str) {
        info!(
            "{} Plan length {:?} Time(microseconds) {:?} Expanded nodes number: {:?} Generated nodes number {:?} Distinct states number {:?}",
            puzzle,
            self.plan_length,
            self.time_us,
            self.expanded_nodes,
            self.generated_nodes,
            self.visited_states
        );
    }
}
