//! Multi-file orchestration: directory loading, bulk operations, crush

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{info, warn};

use crate::config::{Config, CrushPolicy};
use crate::error::{Error, Result};
use crate::model::{Table, Value};
use crate::parser;

/// Membership test a table must pass to join a crush group.
pub type GroupPredicate = Box<dyn Fn(&Table) -> bool>;

/// Outcome of a directory load. One unreadable file never aborts the rest;
/// it lands here instead.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Number of tables added to the corpus.
    pub loaded: usize,
    /// Files that failed to load, with the reason.
    pub skipped: Vec<(PathBuf, Error)>,
}

/// An ordered collection of tables, one per loaded source file.
#[derive(Debug, Default)]
pub struct Corpus {
    config: Config,
    /// Loaded tables, in load order. Crush replaces this wholesale.
    pub datasets: Vec<Table>,
}

impl Corpus {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            datasets: Vec::new(),
        }
    }

    /// Load one file into the corpus.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let table = parser::read_table(path, self.config.metadata_lines)?;
        self.datasets.push(table);
        Ok(())
    }

    /// Load every file in `folder` whose name ends with the configured
    /// extension. Listing order is whatever the host provides; callers must
    /// not rely on it across runs.
    ///
    /// A per-file read failure is isolated: the file is reported in the
    /// returned [`LoadReport`] and the rest of the directory still loads.
    /// Only a failure to list the directory itself is fatal.
    pub fn load_dir(&mut self, folder: &Path) -> Result<LoadReport> {
        let entries = fs::read_dir(folder).map_err(|source| Error::Io {
            path: folder.to_path_buf(),
            source,
        })?;

        let mut report = LoadReport::default();
        for entry in entries {
            let entry = entry.map_err(|source| Error::Io {
                path: folder.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(&self.config.extension))
            {
                continue;
            }
            match self.load(&path) {
                Ok(()) => report.loaded += 1,
                Err(e) => {
                    warn!("skipping {}: {}", path.display(), e);
                    report.skipped.push((path, e));
                }
            }
        }

        info!(
            "{} datasets loaded from {}/*{} ({} skipped)",
            report.loaded,
            folder.display(),
            self.config.extension,
            report.skipped.len()
        );
        Ok(report)
    }

    /// Run `f` over every table.
    pub fn for_each<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Table),
    {
        for table in &mut self.datasets {
            f(table);
        }
    }

    /// Apply one column transform to every table. Tables without the column
    /// are untouched, so heterogeneous corpora are fine.
    pub fn transform_all<F>(&mut self, column: &str, f: F)
    where
        F: Fn(&Value) -> Value,
    {
        for table in &mut self.datasets {
            table.transform(column, &f);
        }
    }

    /// Rename a column in every table. Stops at the first table missing the
    /// old name.
    pub fn rename_all(&mut self, old: &str, new: &str) -> Result<()> {
        for table in &mut self.datasets {
            table.rename(old, new)?;
        }
        Ok(())
    }

    /// Project every table onto the named columns.
    pub fn squeeze_all(&mut self, keep: &[&str]) {
        for table in &mut self.datasets {
            table.squeeze(keep);
        }
    }

    /// Append the same derived column to every table.
    pub fn extend_all<F>(&mut self, column: &str, f: F)
    where
        F: Fn(usize, &Table) -> Value,
    {
        for table in &mut self.datasets {
            table.extend(column, &f);
        }
    }

    /// Regroup the corpus into one table per non-empty group.
    ///
    /// Predicates run in group declaration order against every table in load
    /// order. Within a bucket, members after the first are merged into the
    /// first; the corpus then holds exactly the surviving parents, in group
    /// declaration order. Tables matching no group are discarded. This is a
    /// one-shot, destructive regrouping.
    ///
    /// Under [`CrushPolicy::AllMatches`] a table joining several groups is
    /// duplicated into each of their parents; [`CrushPolicy::FirstMatch`]
    /// stops at the first matching group. On a merge failure the corpus is
    /// left unchanged.
    pub fn crush(&mut self, groups: &IndexMap<String, GroupPredicate>) -> Result<()> {
        let mut buckets: IndexMap<&str, Vec<usize>> = groups
            .keys()
            .map(|label| (label.as_str(), Vec::new()))
            .collect();

        for (ix, table) in self.datasets.iter().enumerate() {
            for (label, predicate) in groups {
                if predicate(table) {
                    if let Some(members) = buckets.get_mut(label.as_str()) {
                        members.push(ix);
                    }
                    if self.config.crush_policy == CrushPolicy::FirstMatch {
                        break;
                    }
                }
            }
        }

        let mut crushed = Vec::new();
        for members in buckets.values() {
            let Some((&first, rest)) = members.split_first() else {
                continue;
            };
            let mut parent = self.datasets[first].clone();
            for &member in rest {
                parent.merge(self.datasets[member].clone())?;
            }
            crushed.push(parent);
        }

        self.datasets = crushed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Schema;

    fn labeled(name: &str, values: &[&str]) -> Table {
        let schema = Schema::parse_header("\"amp\"");
        let rows: Vec<Vec<String>> = values.iter().map(|v| vec![v.to_string()]).collect();
        Table::from_rows(name, &schema, &rows)
    }

    fn name_contains(needle: &'static str) -> GroupPredicate {
        Box::new(move |t: &Table| t.name().contains(needle))
    }

    fn amp(corpus: &Corpus, ix: usize) -> Vec<String> {
        corpus.datasets[ix]
            .column("amp")
            .unwrap()
            .iter()
            .map(|v| v.to_string())
            .collect()
    }

    #[test]
    fn test_crush_groups_and_merges_in_load_order() {
        let mut corpus = Corpus::default();
        corpus.datasets.push(labeled("m1_alpha.atf", &["1", "2"]));
        corpus.datasets.push(labeled("m2_beta.atf", &["3"]));
        corpus.datasets.push(labeled("m3_alpha.atf", &["4"]));

        let mut groups: IndexMap<String, GroupPredicate> = IndexMap::new();
        groups.insert("g1".to_string(), name_contains("alpha"));
        groups.insert("g2".to_string(), name_contains("beta"));
        corpus.crush(&groups).unwrap();

        assert_eq!(corpus.datasets.len(), 2);
        assert_eq!(amp(&corpus, 0), vec!["1", "2", "4"]);
        assert_eq!(amp(&corpus, 1), vec!["3"]);
    }

    #[test]
    fn test_crush_drops_empty_groups_and_unmatched_tables() {
        let mut corpus = Corpus::default();
        corpus.datasets.push(labeled("m1_alpha.atf", &["1"]));
        corpus.datasets.push(labeled("orphan.atf", &["9"]));

        let mut groups: IndexMap<String, GroupPredicate> = IndexMap::new();
        groups.insert("none".to_string(), name_contains("zzz"));
        groups.insert("g1".to_string(), name_contains("alpha"));
        corpus.crush(&groups).unwrap();

        assert_eq!(corpus.datasets.len(), 1);
        assert_eq!(amp(&corpus, 0), vec!["1"]);
    }

    #[test]
    fn test_crush_all_matches_duplicates_into_every_group() {
        let mut corpus = Corpus::default();
        corpus.datasets.push(labeled("m1_alphabeta.atf", &["1"]));
        corpus.datasets.push(labeled("m2_alpha.atf", &["2"]));

        let mut groups: IndexMap<String, GroupPredicate> = IndexMap::new();
        groups.insert("ga".to_string(), name_contains("alpha"));
        groups.insert("gb".to_string(), name_contains("beta"));
        corpus.crush(&groups).unwrap();

        assert_eq!(corpus.datasets.len(), 2);
        assert_eq!(amp(&corpus, 0), vec!["1", "2"]);
        assert_eq!(amp(&corpus, 1), vec!["1"]);
    }

    #[test]
    fn test_crush_first_match_assigns_single_group() {
        let mut corpus = Corpus::new(Config::default().with_crush_policy(CrushPolicy::FirstMatch));
        corpus.datasets.push(labeled("m1_alphabeta.atf", &["1"]));
        corpus.datasets.push(labeled("m2_beta.atf", &["2"]));

        let mut groups: IndexMap<String, GroupPredicate> = IndexMap::new();
        groups.insert("ga".to_string(), name_contains("alpha"));
        groups.insert("gb".to_string(), name_contains("beta"));
        corpus.crush(&groups).unwrap();

        assert_eq!(corpus.datasets.len(), 2);
        assert_eq!(amp(&corpus, 0), vec!["1"]);
        assert_eq!(amp(&corpus, 1), vec!["2"]);
    }

    #[test]
    fn test_crush_merge_failure_leaves_corpus_unchanged() {
        let mut corpus = Corpus::default();
        corpus.datasets.push(labeled("m1_alpha.atf", &["1"]));
        let schema = Schema::parse_header("\"other\"");
        corpus
            .datasets
            .push(Table::from_rows("m2_alpha.atf", &schema, &[vec!["9".to_string()]]));

        let mut groups: IndexMap<String, GroupPredicate> = IndexMap::new();
        groups.insert("ga".to_string(), name_contains("alpha"));
        assert!(corpus.crush(&groups).is_err());
        assert_eq!(corpus.datasets.len(), 2);
    }

    #[test]
    fn test_bulk_transform_skips_tables_without_column() {
        let mut corpus = Corpus::default();
        corpus.datasets.push(labeled("a.atf", &["-5"]));
        let schema = Schema::parse_header("\"other\"");
        corpus
            .datasets
            .push(Table::from_rows("b.atf", &schema, &[vec!["1".to_string()]]));

        corpus.transform_all("amp", |v| Value::from(v.as_f64().map(f64::abs)));
        assert_eq!(amp(&corpus, 0), vec!["5"]);
        assert_eq!(
            corpus.datasets[1].column("other").unwrap()[0],
            Value::from("1")
        );
    }
}
