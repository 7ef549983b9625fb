use confique::Config as _;
use std::sync::OnceLock;

#[derive(confique::Config)]
pub struct Config {
    /// Maximum parser recursion depth (parenthesized expressions and
    /// subqueries) before a statement is rejected as too deeply nested.
    #[config(env = "QFMT_MAX_DEPTH", default = 128)]
    pub max_depth: usize,
}

pub fn config() -> &'static Config {
    static CONFIG: OnceLock<Config> = OnceLock::new();
    CONFIG.get_or_init(|| {
        Config::builder()
            .env()
            .load()
            .expect("Failed to load one or more value configuration from the current environment")
    })
}
