use crate::types::{NavControl, Section, SectionList};
use std::ops::Range;

pub struct Paginator;

impl Paginator {
    /// Number of pages needed to show `total_sections` sections.
    pub fn total_pages(total_sections: usize, page_size: usize) -> usize {
        if page_size == 0 {
            return 0;
        }
        total_sections.div_ceil(page_size)
    }

    /// Index range of the sections visible on 1-based `page`. Pages outside
    /// `[1, total_pages]` yield an empty range.
    pub fn page_range(page: usize, total_sections: usize, page_size: usize) -> Range<usize> {
        let start = page
            .saturating_sub(1)
            .saturating_mul(page_size)
            .min(total_sections);
        let end = if page == 0 {
            start
        } else {
            page.saturating_mul(page_size).min(total_sections)
        };
        start..end
    }

    pub fn page_slice(sections: &SectionList, page: usize, page_size: usize) -> &[Section] {
        &sections.sections()[Self::page_range(page, sections.len(), page_size)]
    }

    /// Navigation controls for `current` out of `total` pages, or `None` when
    /// a single page needs no navigation.
    pub fn navigation(current: usize, total: usize) -> Option<Vec<NavControl>> {
        if total <= 1 {
            return None;
        }

        let mut controls = Vec::with_capacity(total + 2);

        if current > 1 {
            controls.push(NavControl::Previous(current - 1));
        }

        controls.extend((1..=total).map(|number| NavControl::Page {
            number,
            active: number == current,
        }));

        if current < total {
            controls.push(NavControl::Next(current + 1));
        }

        Some(controls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SplitOutcome;

    fn sections(n: usize) -> SectionList {
        let fragments = (1..=n).map(|i| format!("<p>{}</p>", i)).collect();
        SectionList::from_fragments(fragments, SplitOutcome::Delimited("---+".to_string()))
    }

    #[test]
    fn test_thirteen_sections_make_three_pages() {
        let list = sections(13);
        assert_eq!(Paginator::total_pages(list.len(), 6), 3);
        assert_eq!(Paginator::page_slice(&list, 1, 6).len(), 6);
        assert_eq!(Paginator::page_slice(&list, 2, 6).len(), 6);

        let last = Paginator::page_slice(&list, 3, 6);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].index, 13);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(Paginator::total_pages(1, 6), 1);
        assert_eq!(Paginator::total_pages(6, 6), 1);
        assert_eq!(Paginator::total_pages(7, 6), 2);
        assert_eq!(Paginator::total_pages(12, 6), 2);
    }

    #[test]
    fn test_out_of_range_pages_are_empty() {
        let list = sections(4);
        assert!(Paginator::page_slice(&list, 0, 6).is_empty());
        assert!(Paginator::page_slice(&list, 2, 6).is_empty());
        assert!(Paginator::page_slice(&list, usize::MAX, 6).is_empty());
    }

    #[test]
    fn test_navigation_hidden_for_single_page() {
        assert!(Paginator::navigation(1, 1).is_none());
        assert!(Paginator::navigation(1, 0).is_none());
    }

    #[test]
    fn test_navigation_marks_one_active_page() {
        let controls = Paginator::navigation(2, 3).unwrap();
        assert_eq!(
            controls,
            vec![
                NavControl::Previous(1),
                NavControl::Page { number: 1, active: false },
                NavControl::Page { number: 2, active: true },
                NavControl::Page { number: 3, active: false },
                NavControl::Next(3),
            ]
        );
    }

    #[test]
    fn test_navigation_edges_drop_previous_and_next() {
        let first = Paginator::navigation(1, 3).unwrap();
        assert!(!first.iter().any(|c| matches!(c, NavControl::Previous(_))));
        assert_eq!(first.last(), Some(&NavControl::Next(2)));

        let last = Paginator::navigation(3, 3).unwrap();
        assert_eq!(last.first(), Some(&NavControl::Previous(2)));
        assert!(!last.iter().any(|c| matches!(c, NavControl::Next(_))));

        let active = last
            .iter()
            .filter(|c| matches!(c, NavControl::Page { active: true, .. }))
            .count();
        assert_eq!(active, 1);
    }
}
