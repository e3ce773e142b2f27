use news_curator::article::Article;
use news_curator::select;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn list(posted: &[bool]) -> Vec<Article> {
    posted
        .iter()
        .map(|p| Article {
            posted: *p,
            ..Article::default()
        })
        .collect()
}

#[test]
fn pick_always_lands_in_range() {
    let active = list(&[true; 40]);
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        assert!(select::pick_index(&mut rng, &active) < active.len());
    }
}

#[test]
fn unposted_entries_are_found_when_common() {
    // Half the list is unposted; 51 straight misses would need p = 0.5^51,
    // so any seed finds an unposted entry.
    let mut posted = vec![true; 10];
    for i in (0..10).step_by(2) {
        posted[i] = false;
    }
    let active = list(&posted);
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let idx = select::pick_index(&mut rng, &active);
        assert!(!active[idx].posted);
    }
}

#[test]
fn two_entry_list_with_one_unposted_picks_it() {
    let active = list(&[true, false]);
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..50 {
        assert_eq!(select::pick_index(&mut rng, &active), 1);
    }
}

#[test]
fn saturated_list_falls_back_to_index_zero() {
    let active = list(&[true; 25]);
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..20 {
        assert_eq!(select::pick_index(&mut rng, &active), 0);
    }
}
