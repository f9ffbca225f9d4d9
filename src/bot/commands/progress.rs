//! Operator command showing the current download queues.

use crate::bot::commands::Context;
use crate::bot::commands::Error;
use crate::media::error::MediaError;
use crate::media::QueuePage;

const MAX_LISTED_ITEMS: usize = 10;

/// Show the pending Radarr and Sonarr download queues.
#[poise::command(slash_command, rename = "progress")]
pub async fn progress(ctx: Context<'_>) -> Result<(), Error> {
    if let Err(remaining) = ctx
        .data()
        .cooldowns
        .check(ctx.author().id.get(), "progress")
    {
        ctx.say(format!(
            "⏳ You are on cooldown, try again in {}s.",
            remaining.as_secs().max(1)
        ))
        .await?;
        return Ok(());
    }

    ctx.defer().await?;

    let movies = ctx.data().radarr.get_queue().await;
    let series = ctx.data().sonarr.get_queue().await;

    let reply = format!(
        "{}\n\n{}",
        summarize("🎬 Movies", movies),
        summarize("📺 Series", series)
    );
    ctx.say(reply).await?;

    Ok(())
}

fn summarize(header: &str, queue: Result<QueuePage, MediaError>) -> String {
    let page = match queue {
        Ok(page) => page,
        Err(e) => return format!("{}: queue unavailable ({})", header, e),
    };

    let mut out = format!("{} ({} queued)", header, page.total_records);
    for item in page.records.iter().take(MAX_LISTED_ITEMS) {
        let title = item.title.as_deref().unwrap_or("Unknown title");
        let status = item.status.as_deref().unwrap_or("unknown");
        match &item.timeleft {
            Some(timeleft) => {
                out.push_str(&format!("\n- {} [{}] ({} left)", title, status, timeleft));
            }
            None => out.push_str(&format!("\n- {} [{}]", title, status)),
        }
    }
    if page.records.len() > MAX_LISTED_ITEMS {
        out.push_str(&format!(
            "\n... and {} more",
            page.records.len() - MAX_LISTED_ITEMS
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::media::QueueItem;

    use super::*;

    #[test]
    fn test_summarize_lists_queue_items() {
        let page = QueuePage {
            total_records: 2,
            records: vec![
                QueueItem {
                    title: Some("Heat".to_string()),
                    status: Some("downloading".to_string()),
                    timeleft: Some("00:12:00".to_string()),
                },
                QueueItem {
                    title: None,
                    status: None,
                    timeleft: None,
                },
            ],
        };

        let text = summarize("🎬 Movies", Ok(page));
        assert!(text.starts_with("🎬 Movies (2 queued)"));
        assert!(text.contains("- Heat [downloading] (00:12:00 left)"));
        assert!(text.contains("- Unknown title [unknown]"));
    }

    #[test]
    fn test_summarize_reports_unavailable_queue() {
        let err = MediaError::UnexpectedStatus {
            status: 500,
            endpoint: "/api/v3/queue".to_string(),
        };
        let text = summarize("📺 Series", Err(err));
        assert!(text.contains("queue unavailable"));
    }
}
