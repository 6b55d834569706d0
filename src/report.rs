use crate::{executor::RequestResult, stats::SummaryStats};

pub fn request_line(result: &RequestResult, total: usize) -> String {
    let marker = if result.success() { "✅" } else { "❌" };
    format!("Request {}/{}: {} {:.2}ms", result.ordinal + 1, total, marker, result.latency_ms)
}

pub fn print_request(result: &RequestResult, total: usize) {
    println!("{}", request_line(result, total));
}

pub fn summary_block(stats: &SummaryStats) -> String {
    [
        format!("📊 Results (N={}):", stats.total),
        format!("✅ Success Rate: {:.1}%", stats.success_rate),
        "⏱️ Latency (ms):".to_string(),
        format!("  - Avg: {:.2}", stats.mean_ms),
        format!("  - P50: {:.2}", stats.p50_ms),
        format!("  - P90: {:.2}", stats.p90_ms),
        format!("  - P99: {:.2}", stats.p99_ms),
        format!("  - Max: {:.2}", stats.max_ms),
    ]
    .join("\n")
}

pub fn print_summary(stats: &SummaryStats, json: bool) -> serde_json::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
    } else {
        println!("\n{}", summary_block(stats));
    }
    Ok(())
}
