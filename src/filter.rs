use crate::api::{Episode, Show};

/// Yields the searchable field values of an item. An absent optional field
/// contributes nothing; a genre list contributes one value per genre.
pub type Matcher<T> = fn(&T) -> Vec<String>;

/// Shows match on name, summary, or any genre.
pub const SHOW_MATCHERS: &[Matcher<Show>] = &[show_name, show_summary, show_genres];

/// Episodes match on name or summary only; they have no genres.
pub const EPISODE_MATCHERS: &[Matcher<Episode>] = &[episode_name, episode_summary];

/// Keeps the items whose fields contain `term` as a case-insensitive
/// substring, under any of the given matchers. The term is trimmed first; an
/// empty term keeps everything. Order is preserved, never re-sorted.
pub fn filter<T: Clone>(items: &[T], term: &str, matchers: &[Matcher<T>]) -> Vec<T> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| {
            matchers
                .iter()
                .flat_map(|matcher| matcher(item))
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

fn show_name(show: &Show) -> Vec<String> {
    vec![show.name.clone()]
}

fn show_summary(show: &Show) -> Vec<String> {
    show.summary.clone().into_iter().collect()
}

fn show_genres(show: &Show) -> Vec<String> {
    show.genres.clone()
}

fn episode_name(episode: &Episode) -> Vec<String> {
    vec![episode.name.clone()]
}

fn episode_summary(episode: &Episode) -> Vec<String> {
    vec![episode.summary.clone()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixtures::{episode, show};

    fn sample_shows() -> Vec<Show> {
        let alpha = show(1, "Alpha");
        let mut beta = show(2, "Beta Show");
        beta.genres = vec!["Drama".to_string()];
        vec![alpha, beta]
    }

    fn ids(shows: &[Show]) -> Vec<u64> {
        shows.iter().map(|s| s.id).collect()
    }

    #[test]
    fn empty_term_is_identity() {
        let shows = sample_shows();
        assert_eq!(ids(&filter(&shows, "", SHOW_MATCHERS)), vec![1, 2]);
    }

    #[test]
    fn whitespace_term_is_identity() {
        let shows = sample_shows();
        assert_eq!(ids(&filter(&shows, "   ", SHOW_MATCHERS)), vec![1, 2]);
    }

    #[test]
    fn matches_by_name() {
        let shows = sample_shows();
        assert_eq!(ids(&filter(&shows, "alpha", SHOW_MATCHERS)), vec![1]);
    }

    #[test]
    fn matches_by_genre() {
        let shows = sample_shows();
        assert_eq!(ids(&filter(&shows, "drama", SHOW_MATCHERS)), vec![2]);
    }

    #[test]
    fn matches_by_summary() {
        let mut shows = sample_shows();
        shows[0].summary = Some("<p>A quiet mountain village.</p>".to_string());
        assert_eq!(ids(&filter(&shows, "VILLAGE", SHOW_MATCHERS)), vec![1]);
    }

    #[test]
    fn missing_summary_never_matches_nor_errors() {
        let shows = sample_shows();
        assert!(filter(&shows, "village", SHOW_MATCHERS).is_empty());
    }

    #[test]
    fn result_is_ordered_subsequence() {
        let shows = vec![show(1, "Aa"), show(2, "ab"), show(3, "zz"), show(4, "AB")];
        assert_eq!(ids(&filter(&shows, "a", SHOW_MATCHERS)), vec![1, 2, 4]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let shows = sample_shows();
        let once = filter(&shows, "beta", SHOW_MATCHERS);
        let twice = filter(&once, "beta", SHOW_MATCHERS);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn episodes_match_on_name_and_summary_only() {
        let mut pilot = episode(10, 1, 1, "Pilot");
        pilot.summary = "<p>A dramatic beginning.</p>".to_string();
        let finale = episode(11, 1, 2, "Finale");
        let eps = vec![pilot, finale];

        let hits = filter(&eps, "dramatic", EPISODE_MATCHERS);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 10);

        let by_name = filter(&eps, "finale", EPISODE_MATCHERS);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, 11);
    }
}
