pub mod mcp;

pub async fn health() -> &'static str {
    "ok"
}
