//! Temporal grouping of observations.
//!
//! Observations inside a year window are sorted by date and cut into a fixed
//! number of contiguous groups. When the count does not divide evenly, the
//! larger groups come first:
//!
//! ```text
//!   12 observations, 5 groups
//!   [0 1 2][3 4 5][6 7][8 9][10 11]
//!     3      3     2    2     2
//! ```

use serde::Serialize;
use std::ops::Range;

use storm_common::{Observation, YearRange};

/// One contiguous slice of the sorted, filtered observations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub index: usize,
    /// Positions into [`TemporalGroups::observations`]
    pub range: Range<usize>,
    /// First and last year covered; `None` for an empty group
    pub years: Option<YearRange>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Display label, e.g. `"1851 - 1885"`.
    pub fn label(&self) -> String {
        match self.years {
            Some(years) => years.to_string(),
            None => "no observations".to_string(),
        }
    }
}

/// Observations of a year window, sorted by date and partitioned into groups.
#[derive(Debug, Clone, Default)]
pub struct TemporalGroups {
    observations: Vec<Observation>,
    groups: Vec<Group>,
    combined: Option<Group>,
}

/// Sizes of `group_count` contiguous groups covering `total` items.
///
/// The first `total % group_count` groups hold one extra item.
pub fn partition_sizes(total: usize, group_count: usize) -> Vec<usize> {
    if group_count == 0 {
        return Vec::new();
    }
    let base = total / group_count;
    let remainder = total % group_count;
    (0..group_count)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

impl TemporalGroups {
    /// Filter `all` to `window`, sort by date and split into `group_count` groups.
    ///
    /// The sort is stable, so observations sharing a date keep their dataset
    /// order. An empty filtered set yields no groups at all.
    pub fn build(
        all: &[Observation],
        window: YearRange,
        group_count: usize,
        include_combined: bool,
    ) -> Self {
        let mut observations: Vec<Observation> = all
            .iter()
            .filter(|obs| window.contains_date(obs.date))
            .cloned()
            .collect();
        observations.sort_by_key(|obs| obs.date);

        if observations.is_empty() || group_count == 0 {
            return Self {
                observations,
                ..Default::default()
            };
        }

        let mut groups = Vec::with_capacity(group_count);
        let mut start = 0;
        for (index, size) in partition_sizes(observations.len(), group_count)
            .into_iter()
            .enumerate()
        {
            let range = start..start + size;
            groups.push(Group {
                index,
                years: years_of(&observations[range.clone()]),
                range,
            });
            start += size;
        }

        let combined = include_combined.then(|| Group {
            index: group_count,
            range: 0..observations.len(),
            years: years_of(&observations),
        });

        Self {
            observations,
            groups,
            combined,
        }
    }

    /// Filtered observations in date order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    /// The "all periods combined" group, when enabled and non-empty.
    pub fn combined(&self) -> Option<&Group> {
        self.combined.as_ref()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of filtered observations.
    pub fn total(&self) -> usize {
        self.observations.len()
    }

    /// Observations belonging to `group`.
    pub fn slice(&self, group: &Group) -> &[Observation] {
        &self.observations[group.range.clone()]
    }

    /// Observation slices of every time group, in group order.
    pub fn slices(&self) -> impl Iterator<Item = &[Observation]> + '_ {
        self.groups.iter().map(move |g| self.slice(g))
    }
}

fn years_of(observations: &[Observation]) -> Option<YearRange> {
    let first = observations.first()?;
    let last = observations.last()?;
    Some(YearRange::new(first.year(), last.year()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{fixtures, sequential_observations};

    #[test]
    fn test_partition_sizes_larger_first() {
        assert_eq!(partition_sizes(12, 5), vec![3, 3, 2, 2, 2]);
        assert_eq!(partition_sizes(10, 5), vec![2, 2, 2, 2, 2]);
        assert_eq!(partition_sizes(3, 5), vec![1, 1, 1, 0, 0]);
        assert_eq!(partition_sizes(7, 0), Vec::<usize>::new());
    }

    #[test]
    fn test_partition_covers_everything() {
        for total in 0..40 {
            for count in 1..8 {
                let sizes = partition_sizes(total, count);
                assert_eq!(sizes.iter().sum::<usize>(), total);
                let max = sizes.iter().max().copied().unwrap_or(0);
                let min = sizes.iter().min().copied().unwrap_or(0);
                assert!(max - min <= 1);
                assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
            }
        }
    }

    #[test]
    fn test_groups_are_contiguous() {
        let all = sequential_observations(12, 1950);
        let groups = TemporalGroups::build(&all, YearRange::new(1851, 2024), 5, true);

        let lens: Vec<usize> = groups.groups().iter().map(Group::len).collect();
        assert_eq!(lens, vec![3, 3, 2, 2, 2]);

        let mut expected_start = 0;
        for group in groups.groups() {
            assert_eq!(group.range.start, expected_start);
            expected_start = group.range.end;
        }
        assert_eq!(expected_start, 12);

        assert_eq!(groups.groups()[0].years, Some(YearRange::new(1950, 1952)));
        assert_eq!(groups.groups()[4].years, Some(YearRange::new(1960, 1961)));
    }

    #[test]
    fn test_filter_and_sort() {
        let all = fixtures::storm_dataset();
        let groups = TemporalGroups::build(&all, YearRange::new(1990, 2010), 2, false);

        assert_eq!(groups.total(), 3 + 4 + 9);
        assert!(groups
            .observations()
            .windows(2)
            .all(|w| w[0].date <= w[1].date));
        assert!(groups.combined().is_none());
    }

    #[test]
    fn test_empty_window_has_no_groups() {
        let all = fixtures::storm_dataset();
        let groups = TemporalGroups::build(&all, YearRange::new(1920, 1930), 5, true);
        assert!(groups.is_empty());
        assert!(groups.combined().is_none());
        assert_eq!(groups.slices().count(), 0);
    }

    #[test]
    fn test_fewer_observations_than_groups() {
        let all = sequential_observations(3, 1950);
        let groups = TemporalGroups::build(&all, YearRange::new(1851, 2024), 5, true);
        assert_eq!(groups.len(), 5);
        assert!(groups.groups()[3].is_empty());
        assert_eq!(groups.groups()[4].years, None);
        assert_eq!(groups.groups()[4].label(), "no observations");

        let combined = groups.combined().unwrap();
        assert_eq!(combined.len(), 3);
        assert_eq!(combined.label(), "1950 - 1952");
    }

    #[test]
    fn test_same_date_keeps_dataset_order() {
        let a = fixtures::observation("A", "A", 20000101, 30.0, -90.0, 50, "TS");
        let b = fixtures::observation("B", "B", 19990101, 30.0, -90.0, 50, "TS");
        let c = fixtures::observation("C", "C", 20000101, 30.0, -90.0, 50, "TS");
        let groups = TemporalGroups::build(&[a, b, c], YearRange::new(1990, 2010), 1, false);
        let ids: Vec<&str> = groups.observations().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
    }
}
