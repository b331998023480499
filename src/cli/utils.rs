use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::models::InstructorListing;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let Some(data_value) = data {
                response["data"] = data_value;
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// JSON array as-is, or one line per row through `line`
pub fn output_rows<T, F>(output_format: OutputFormat, rows: &[T], empty_message: &str, line: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Text if rows.is_empty() => println!("{}", empty_message),
        OutputFormat::Text => {
            for row in rows {
                println!("{}", line(row));
            }
        }
    }
    Ok(())
}

/// One-line summary of a directory entry
pub fn listing_line(listing: &InstructorListing) -> String {
    let rating = match listing.average_rating {
        Some(avg) => format!("{:.1} ({} reviews)", avg, listing.review_count),
        None => "—".to_string(),
    };
    format!(
        "{:<24} {:<20} {:<16} {:<20} {}",
        listing.profile.name.as_deref().unwrap_or("(unnamed)"),
        listing.profile.specialty.as_deref().unwrap_or(""),
        rating,
        listing.location.as_deref().unwrap_or(""),
        listing.profile.categories.join(", ")
    )
}
