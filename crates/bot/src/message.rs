//! Island message formatting and inline keyboards.
//!
//! Formatting is pure: the same island always renders to the same string.
//! Free-text fields from the marketplace (name, description, queue string)
//! are HTML-escaped before they touch markup.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::html::escape;
use turnip_core::Island;
use url::Url;

/// Callback payload prefix for island detail buttons.
pub const DETAILS_PREFIX: &str = "details:";

const ISLAND_PAGE_BASE: &str = "https://turnip.exchange/island/";

/// Render one island as an HTML block.
///
/// The description is only included for detail views; fan-out messages
/// keep it out to stay scannable.
pub fn format_island(island: &Island, include_description: bool) -> String {
    let rating = if island.rating_count > 0 {
        let stars = "⭐️".repeat(island.rating.round().max(0.0) as usize);
        format!("{} ({} votes)", stars, island.rating_count)
    } else {
        "Nothing yet".to_string()
    };

    let mut text = format!(
        "🏝 <b>{} - <i>{}</i></b>\n\
         <b>Turnip Price: 💰 {} bells/turnip</b>\n\
         <b>Fee:</b> {}\n\
         Island rating: {}\n\
         <b>Hemisphere:</b> {}\n\
         <b>Queue:</b> {} {}\n",
        escape(&island.name),
        escape(&island.creation_time),
        island.turnip_price,
        if island.has_fee() {
            "✅ Has fee"
        } else {
            "🚫 No fee"
        },
        rating,
        island.hemisphere.as_str(),
        island.queue_load().emoji(),
        escape(&island.queued),
    );

    if include_description {
        text.push_str(&format!(
            "<b>Description:</b> {}\n",
            escape(&island.description)
        ));
    }

    text
}

/// Combined fan-out message: header, one block per match, footer.
pub fn matches_message(islands: &[&Island]) -> String {
    let mut msg =
        String::from("Hey, we found some islands with the price you are looking for:\n\n");
    for island in islands {
        msg.push_str(&format_island(island, false));
        msg.push('\n');
    }
    msg.push_str("Click on the island name below to see more details.");
    msg
}

/// One callback button per island, payload `details:<name>`.
pub fn details_keyboard(islands: &[&Island]) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = islands
        .iter()
        .map(|island| {
            vec![InlineKeyboardButton::callback(
                island.name.clone(),
                format!("{DETAILS_PREFIX}{}", island.name),
            )]
        })
        .collect();
    InlineKeyboardMarkup::new(rows)
}

/// Deep-link button to the island's page on Turnip.Exchange.
///
/// Returns `None` when the island code does not form a valid URL; the
/// detail message is still sent, just without the button.
pub fn island_link_keyboard(island: &Island) -> Option<InlineKeyboardMarkup> {
    let url = Url::parse(&format!("{ISLAND_PAGE_BASE}{}", island.turnip_code)).ok()?;
    Some(InlineKeyboardMarkup::new([[InlineKeyboardButton::url(
        "Go to island on Turnip.Exchange",
        url,
    )]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use turnip_core::Hemisphere;

    fn island(name: &str, price: u32) -> Island {
        Island {
            name: name.to_string(),
            turnip_price: price,
            turnip_code: "4f3a2b".to_string(),
            hemisphere: Hemisphere::North,
            fee: 1,
            queued: "2/12".to_string(),
            max_queue: 12,
            rating: 4.4,
            rating_count: 9,
            description: "bring <gifts> & tips".to_string(),
            creation_time: "2026-08-24 18:02:11".to_string(),
            islander: String::new(),
            category: String::new(),
        }
    }

    // === Formatting tests ===

    #[test]
    fn test_format_is_deterministic() {
        let i = island("Mora", 512);
        assert_eq!(format_island(&i, true), format_island(&i, true));
        assert_eq!(format_island(&i, false), format_island(&i, false));
    }

    #[test]
    fn test_escapes_untrusted_text() {
        let mut i = island("<b>Mora & co</b>", 512);
        i.description = "a<b>c & d".to_string();
        let text = format_island(&i, true);

        assert!(text.contains("&lt;b&gt;Mora &amp; co&lt;/b&gt;"));
        assert!(text.contains("a&lt;b&gt;c &amp; d"));
        assert!(!text.contains("<b>Mora"));
    }

    #[test]
    fn test_description_toggle() {
        let i = island("Mora", 512);
        assert!(format_island(&i, true).contains("<b>Description:</b>"));
        assert!(!format_island(&i, false).contains("Description"));
    }

    #[test]
    fn test_rating_branches() {
        let mut i = island("Mora", 512);
        i.rating = 3.6;
        i.rating_count = 21;
        let text = format_island(&i, false);
        assert!(text.contains(&"⭐️".repeat(4)));
        assert!(text.contains("(21 votes)"));

        i.rating_count = 0;
        assert!(format_island(&i, false).contains("Island rating: Nothing yet"));
    }

    #[test]
    fn test_queue_indicator() {
        let mut i = island("Mora", 512);
        let text = format_island(&i, false);
        assert!(text.contains("🟩 2/12"));

        i.queued = "9/12".to_string();
        assert!(format_island(&i, false).contains("🟥 9/12"));
    }

    #[test]
    fn test_fee_branches() {
        let mut i = island("Mora", 512);
        assert!(format_island(&i, false).contains("✅ Has fee"));
        i.fee = 0;
        assert!(format_island(&i, false).contains("🚫 No fee"));
    }

    // === Keyboard tests ===

    #[test]
    fn test_details_keyboard_payloads() {
        let a = island("Mora", 512);
        let b = island("Tortimer", 98);
        let keyboard = details_keyboard(&[&a, &b]);

        assert_eq!(keyboard.inline_keyboard.len(), 2);
        let payloads: Vec<String> = keyboard
            .inline_keyboard
            .iter()
            .map(|row| format!("{:?}", row[0].kind))
            .collect();
        assert!(payloads[0].contains("details:Mora"));
        assert!(payloads[1].contains("details:Tortimer"));
    }

    #[test]
    fn test_island_link_keyboard() {
        let i = island("Mora", 512);
        let keyboard = island_link_keyboard(&i).unwrap();
        assert!(format!("{:?}", keyboard.inline_keyboard[0][0].kind)
            .contains("https://turnip.exchange/island/4f3a2b"));
    }

    #[test]
    fn test_matches_message_layout() {
        let a = island("Mora", 512);
        let b = island("Tortimer", 98);
        let msg = matches_message(&[&a, &b]);

        assert!(msg.starts_with("Hey, we found some islands"));
        assert!(msg.contains("Mora"));
        assert!(msg.contains("Tortimer"));
        assert!(msg.ends_with("Click on the island name below to see more details."));
    }
}
