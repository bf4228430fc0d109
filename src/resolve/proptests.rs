//! Property-based tests for mention scanning and stripping.
//!
//! Properties:
//! - Stripped length = original length minus the sum of matched token bytes
//! - Every mention offset is a char boundary inside the stripped buffer
//! - Re-inserting tokens at their offsets (rightmost first) reconstructs
//!   the original text when every handle resolves

use super::*;
use proptest::prelude::*;

/// Build a text interleaving filler words and handle tokens.
fn build_text(words: &[String], handles: &[String]) -> String {
    let mut text = String::new();
    let mut handle_iter = handles.iter();
    for word in words {
        text.push_str(word);
        text.push(' ');
        if let Some(handle) = handle_iter.next() {
            text.push('@');
            text.push_str(handle);
            text.push(' ');
        }
    }
    text
}

proptest! {
    /// Stripping removes exactly the matched token bytes, nothing else.
    #[test]
    fn stripped_length_accounts_for_every_token(
        words in prop::collection::vec("[a-z]{1,8}", 1..6),
        handles in prop::collection::vec("[a-z][a-z0-9]{0,10}", 0..5),
    ) {
        let raw = build_text(&words, &handles);
        let tokens = scan_handles(&raw);

        let resolved: HashMap<String, AccountId> = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.handle.clone(), AccountId(i as u64 + 1)))
            .collect();

        let result = strip_and_index(&raw, &tokens, &resolved);

        let token_bytes: usize = tokens.iter().map(|t| t.end - t.start).sum();
        prop_assert_eq!(result.text.len(), raw.len() - token_bytes);

        for mention in &result.mentions {
            prop_assert!(result.text.is_char_boundary(mention.position as usize));
        }
    }

    /// With every handle resolvable, re-inserting each token at its offset
    /// in descending order reconstructs the original text.
    #[test]
    fn reinserting_tokens_reconstructs_original(
        words in prop::collection::vec("[a-z]{1,8}", 1..6),
        handles in prop::collection::vec("[a-z][a-z0-9]{0,10}", 1..5),
    ) {
        let raw = build_text(&words, &handles);
        let tokens = scan_handles(&raw);

        let resolved: HashMap<String, AccountId> = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.handle.clone(), AccountId(i as u64 + 1)))
            .collect();

        let result = strip_and_index(&raw, &tokens, &resolved);
        prop_assert_eq!(result.mentions.len(), tokens.len());

        let mut rebuilt = result.text.clone();
        for mention in result.mentions.iter().rev() {
            rebuilt.insert_str(mention.position as usize, &format!("@{}", mention.handle));
        }
        prop_assert_eq!(rebuilt, raw);
    }

    /// With nothing resolvable, tokens are still stripped but no mentions
    /// are produced.
    #[test]
    fn unresolvable_tokens_strip_to_empty_mention_list(
        words in prop::collection::vec("[a-z]{1,8}", 1..6),
        handles in prop::collection::vec("[a-z][a-z0-9]{0,10}", 1..5),
    ) {
        let raw = build_text(&words, &handles);
        let tokens = scan_handles(&raw);

        let result = strip_and_index(&raw, &tokens, &HashMap::new());

        prop_assert!(result.mentions.is_empty());
        let token_bytes: usize = tokens.iter().map(|t| t.end - t.start).sum();
        prop_assert_eq!(result.text.len(), raw.len() - token_bytes);
    }
}
