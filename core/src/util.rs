use rand::{distributions::Alphanumeric, Rng};

const ID_LEN: usize = 12;

/// Random identifier for problems, testcases and submissions.
pub fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

pub fn millis(d: std::time::Duration) -> u64 {
    d.as_millis().try_into().unwrap_or(u64::MAX)
}
