//! Static substitution tables used to shorten search parameters.
//!
//! Tables are partitioned by group. The group in effect is decided by the
//! key being entered: `tableFilter` opens the table-filter group for its
//! subtree, `treeInfo` the tree-info group, and so on. Entering any other
//! record switches to [`DictionaryGroup::Verbatim`], where keys are data
//! (config names, architectures) and are never substituted.
//!
//! String values are substituted only under the keys a group lists in
//! `enum_keys`. Free-text fields such as `treeSearch` keep their text even
//! when it equals a short code.

use std::collections::HashSet;

use crate::error::DictionaryError;

/// A `(long form, short code)` substitution.
pub type Substitution = (&'static str, &'static str);

/// Characters that already carry meaning in the query string or in type
/// table patterns.
pub(crate) const QUERY_SYNTAX: [char; 10] = ['&', '=', '[', ']', ',', '%', '+', '#', '?', '*'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DictionaryGroup {
    General,
    TreeInfo,
    TableFilter,
    DiffFilter,
    Verbatim,
}

impl DictionaryGroup {
    pub fn name(self) -> &'static str {
        match self {
            DictionaryGroup::General => "general",
            DictionaryGroup::TreeInfo => "tree-info",
            DictionaryGroup::TableFilter => "table-filter",
            DictionaryGroup::DiffFilter => "diff-filter",
            DictionaryGroup::Verbatim => "verbatim",
        }
    }
}

/// Substitutions for one group.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupTable {
    pub keys: &'static [Substitution],
    pub values: &'static [Substitution],
    /// Long key names whose string values go through `values`. Values under
    /// any other key are free text and never substituted.
    pub enum_keys: &'static [&'static str],
    /// Long key names that open a nested group.
    pub children: &'static [(&'static str, DictionaryGroup)],
}

impl GroupTable {
    pub const EMPTY: GroupTable = GroupTable {
        keys: &[],
        values: &[],
        enum_keys: &[],
        children: &[],
    };
}

const GENERAL: GroupTable = GroupTable {
    keys: &[
        ("currentPageTab", "p"),
        ("treeSearch", "ts"),
        ("hardwareSearch", "hs"),
        ("startTimestampInSeconds", "st"),
        ("endTimestampInSeconds", "et"),
        ("selectedCommits", "sc"),
        ("treeCommits", "tc"),
    ],
    values: &[
        ("all", "a"),
        ("success", "s"),
        ("failed", "f"),
        ("inconclusive", "i"),
        ("valid", "v"),
        ("invalid", "iv"),
        ("null", "n"),
        ("global.builds", "gb"),
        ("global.boots", "gbt"),
        ("global.tests", "gt"),
    ],
    enum_keys: &["currentPageTab"],
    children: &[
        ("treeInfo", DictionaryGroup::TreeInfo),
        ("tableFilter", DictionaryGroup::TableFilter),
        ("diffFilter", DictionaryGroup::DiffFilter),
    ],
};

const TREE_INFO: GroupTable = GroupTable {
    keys: &[
        ("gitBranch", "gb"),
        ("gitUrl", "gu"),
        ("headCommitHash", "hch"),
        ("commitName", "cn"),
    ],
    values: &[],
    enum_keys: &[],
    children: &[],
};

const TABLE_FILTER: GroupTable = GroupTable {
    keys: &[("issuesTable", "is")],
    values: &[],
    enum_keys: &[],
    children: &[],
};

const DIFF_FILTER: GroupTable = GroupTable {
    keys: &[
        ("buildStatus", "bs"),
        ("bootStatus", "bts"),
        ("testStatus", "tss"),
        ("compilers", "cm"),
        ("hardware", "hw"),
        ("trees", "tr"),
        ("bootPath", "bp"),
        ("issues", "is"),
    ],
    values: &[],
    enum_keys: &[],
    children: &[],
};

/// The full set of group tables.
#[derive(Debug, Clone, Copy)]
pub struct Dictionaries {
    general: GroupTable,
    tree_info: GroupTable,
    table_filter: GroupTable,
    diff_filter: GroupTable,
}

impl Default for Dictionaries {
    fn default() -> Self {
        Self::standard()
    }
}

impl Dictionaries {
    pub const fn new(
        general: GroupTable,
        tree_info: GroupTable,
        table_filter: GroupTable,
        diff_filter: GroupTable,
    ) -> Self {
        Self {
            general,
            tree_info,
            table_filter,
            diff_filter,
        }
    }

    /// Tables shipped with the dashboard.
    pub const fn standard() -> Self {
        Self::new(GENERAL, TREE_INFO, TABLE_FILTER, DIFF_FILTER)
    }

    /// No substitutions. Group switching still follows the standard schema.
    pub const fn empty() -> Self {
        Self::new(
            GroupTable {
                children: GENERAL.children,
                ..GroupTable::EMPTY
            },
            GroupTable::EMPTY,
            GroupTable::EMPTY,
            GroupTable::EMPTY,
        )
    }

    pub fn groups(&self) -> [(DictionaryGroup, &GroupTable); 4] {
        [
            (DictionaryGroup::General, &self.general),
            (DictionaryGroup::TreeInfo, &self.tree_info),
            (DictionaryGroup::TableFilter, &self.table_filter),
            (DictionaryGroup::DiffFilter, &self.diff_filter),
        ]
    }

    pub fn table(&self, group: DictionaryGroup) -> Option<&GroupTable> {
        match group {
            DictionaryGroup::General => Some(&self.general),
            DictionaryGroup::TreeInfo => Some(&self.tree_info),
            DictionaryGroup::TableFilter => Some(&self.table_filter),
            DictionaryGroup::DiffFilter => Some(&self.diff_filter),
            DictionaryGroup::Verbatim => None,
        }
    }

    pub fn minify_key<'a>(&self, group: DictionaryGroup, key: &'a str) -> &'a str {
        self.table(group)
            .and_then(|table| lookup_short(table.keys, key))
            .unwrap_or(key)
    }

    pub fn unminify_key<'a>(&self, group: DictionaryGroup, key: &'a str) -> &'a str {
        self.table(group)
            .and_then(|table| lookup_long(table.keys, key))
            .unwrap_or(key)
    }

    /// Short code for `value` when `long_key` holds enumerated values in
    /// `group`.
    pub fn minify_value<'a>(
        &self,
        group: DictionaryGroup,
        long_key: &str,
        value: &'a str,
    ) -> &'a str {
        self.enum_table(group, long_key)
            .and_then(|table| lookup_short(table.values, value))
            .unwrap_or(value)
    }

    pub fn unminify_value<'a>(
        &self,
        group: DictionaryGroup,
        long_key: &str,
        value: &'a str,
    ) -> &'a str {
        self.enum_table(group, long_key)
            .and_then(|table| lookup_long(table.values, value))
            .unwrap_or(value)
    }

    fn enum_table(&self, group: DictionaryGroup, long_key: &str) -> Option<&GroupTable> {
        self.table(group)
            .filter(|table| table.enum_keys.iter().any(|key| *key == long_key))
    }

    /// Group in effect below `long_key` when it holds a nested record.
    pub fn child_group(&self, group: DictionaryGroup, long_key: &str) -> DictionaryGroup {
        self.table(group)
            .and_then(|table| {
                table
                    .children
                    .iter()
                    .find(|(name, _)| *name == long_key)
                    .map(|(_, child)| *child)
            })
            .unwrap_or(DictionaryGroup::Verbatim)
    }

    /// Minifies a long key path segment by segment, tracking groups the same
    /// way [`crate::minify_params`] does. `*` segments are kept and leave the
    /// remainder of the path verbatim.
    pub fn minify_path(&self, segments: &[&str]) -> Vec<String> {
        let mut group = DictionaryGroup::General;
        segments
            .iter()
            .map(|segment| {
                if *segment == "*" {
                    group = DictionaryGroup::Verbatim;
                    return (*segment).to_string();
                }
                let short = self.minify_key(group, segment).to_string();
                group = self.child_group(group, segment);
                short
            })
            .collect()
    }

    /// Checks that every group can be inverted unambiguously and that no
    /// entry collides with the query syntax or the path separator.
    pub fn validate(&self, separator: char) -> Result<(), DictionaryError> {
        for (group, table) in self.groups() {
            let name = group.name();
            let mut key_longs: Vec<&'static str> = table.keys.iter().map(|(long, _)| *long).collect();
            key_longs.extend(table.children.iter().map(|(long, _)| *long));

            check_substitutions(name, table.keys, &key_longs, separator)?;
            let value_longs: Vec<&'static str> = table.values.iter().map(|(long, _)| *long).collect();
            check_substitutions(name, table.values, &value_longs, separator)?;

            for &(long, _) in table.children {
                check_reserved(name, long, separator)?;
            }
            for &long in table.enum_keys {
                check_reserved(name, long, separator)?;
            }
        }
        Ok(())
    }
}

fn lookup_short(pairs: &'static [Substitution], long: &str) -> Option<&'static str> {
    pairs
        .iter()
        .find(|(candidate, _)| *candidate == long)
        .map(|(_, short)| *short)
}

fn lookup_long(pairs: &'static [Substitution], short: &str) -> Option<&'static str> {
    pairs
        .iter()
        .find(|(_, candidate)| *candidate == short)
        .map(|(long, _)| *long)
}

fn check_reserved(
    group: &'static str,
    entry: &'static str,
    separator: char,
) -> Result<(), DictionaryError> {
    let reserved = entry
        .chars()
        .find(|c| *c == separator || QUERY_SYNTAX.contains(c));
    match reserved {
        Some(reserved) => Err(DictionaryError::ReservedCharacter {
            group,
            entry,
            reserved,
        }),
        None => Ok(()),
    }
}

fn check_substitutions(
    group: &'static str,
    pairs: &'static [Substitution],
    longs: &[&'static str],
    separator: char,
) -> Result<(), DictionaryError> {
    let mut seen_long: HashSet<&str> = HashSet::new();
    for (index, &(long, short)) in pairs.iter().enumerate() {
        check_reserved(group, long, separator)?;
        check_reserved(group, short, separator)?;

        if !seen_long.insert(long) {
            return Err(DictionaryError::DuplicateLongForm { group, long });
        }
        if let Some(&(first, _)) = pairs[..index].iter().find(|(_, other)| *other == short) {
            return Err(DictionaryError::DuplicateShortCode {
                group,
                short,
                first,
                second: long,
            });
        }
        if let Some(&shadowed) = longs.iter().find(|other| **other == short && **other != long) {
            return Err(DictionaryError::ShortCodeShadowsKey {
                group,
                short,
                long: shadowed,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_tables_are_valid() {
        assert_eq!(Dictionaries::standard().validate('|'), Ok(()));
        assert_eq!(Dictionaries::empty().validate('|'), Ok(()));
    }

    #[test]
    fn standard_tables_are_injective_per_group() {
        for (group, table) in Dictionaries::standard().groups() {
            for pairs in [table.keys, table.values] {
                let shorts: HashSet<&str> = pairs.iter().map(|(_, short)| *short).collect();
                let longs: HashSet<&str> = pairs.iter().map(|(long, _)| *long).collect();
                assert_eq!(shorts.len(), pairs.len(), "{} short codes", group.name());
                assert_eq!(longs.len(), pairs.len(), "{} long forms", group.name());
            }
        }
    }

    #[test]
    fn key_lookups_are_group_scoped() {
        let dict = Dictionaries::standard();
        assert_eq!(dict.minify_key(DictionaryGroup::TreeInfo, "gitBranch"), "gb");
        assert_eq!(dict.minify_key(DictionaryGroup::General, "gitBranch"), "gitBranch");
        assert_eq!(dict.unminify_key(DictionaryGroup::DiffFilter, "is"), "issues");
        assert_eq!(dict.unminify_key(DictionaryGroup::TableFilter, "is"), "issuesTable");
        assert_eq!(dict.unminify_key(DictionaryGroup::Verbatim, "is"), "is");
    }

    #[test]
    fn values_are_only_substituted_under_enum_keys() {
        let dict = Dictionaries::standard();
        let general = DictionaryGroup::General;
        assert_eq!(dict.minify_value(general, "currentPageTab", "global.tests"), "gt");
        assert_eq!(dict.unminify_value(general, "currentPageTab", "gbt"), "global.boots");
        assert_eq!(dict.minify_value(general, "treeSearch", "failed"), "failed");
        assert_eq!(dict.unminify_value(general, "treeSearch", "a"), "a");
        assert_eq!(dict.unminify_value(general, "hardwareSearch", "gb"), "gb");
        assert_eq!(
            dict.minify_value(DictionaryGroup::TableFilter, "bootsTable", "failed"),
            "failed"
        );
    }

    #[test]
    fn child_groups_follow_schema() {
        let dict = Dictionaries::standard();
        assert_eq!(
            dict.child_group(DictionaryGroup::General, "tableFilter"),
            DictionaryGroup::TableFilter
        );
        assert_eq!(
            dict.child_group(DictionaryGroup::DiffFilter, "configs"),
            DictionaryGroup::Verbatim
        );
        assert_eq!(
            dict.child_group(DictionaryGroup::Verbatim, "tableFilter"),
            DictionaryGroup::Verbatim
        );
    }

    #[test]
    fn minify_path_tracks_groups_and_wildcards() {
        let dict = Dictionaries::standard();
        assert_eq!(
            dict.minify_path(&["treeInfo", "gitBranch"]),
            vec!["treeInfo", "gb"]
        );
        assert_eq!(
            dict.minify_path(&["diffFilter", "*", "bootPath"]),
            vec!["diffFilter", "*", "bootPath"]
        );
        assert_eq!(dict.minify_path(&["startTimestampInSeconds"]), vec!["st"]);
    }

    #[test]
    fn validate_reports_duplicate_short_codes() {
        const KEYS: &[Substitution] = &[("alpha", "a"), ("apple", "a")];
        let dict = Dictionaries::new(
            GroupTable {
                keys: KEYS,
                ..GroupTable::EMPTY
            },
            GroupTable::EMPTY,
            GroupTable::EMPTY,
            GroupTable::EMPTY,
        );
        assert_eq!(
            dict.validate('|'),
            Err(DictionaryError::DuplicateShortCode {
                group: "general",
                short: "a",
                first: "alpha",
                second: "apple",
            })
        );
    }

    #[test]
    fn validate_reports_shadowed_keys() {
        const KEYS: &[Substitution] = &[("tree", "t"), ("t", "x")];
        let dict = Dictionaries::new(
            GroupTable::EMPTY,
            GroupTable {
                keys: KEYS,
                ..GroupTable::EMPTY
            },
            GroupTable::EMPTY,
            GroupTable::EMPTY,
        );
        assert_eq!(
            dict.validate('|'),
            Err(DictionaryError::ShortCodeShadowsKey {
                group: "tree-info",
                short: "t",
                long: "t",
            })
        );
    }

    #[test]
    fn validate_reports_separator_inside_entries() {
        const VALUES: &[Substitution] = &[("a|b", "ab")];
        let dict = Dictionaries::new(
            GroupTable {
                values: VALUES,
                ..GroupTable::EMPTY
            },
            GroupTable::EMPTY,
            GroupTable::EMPTY,
            GroupTable::EMPTY,
        );
        assert_eq!(
            dict.validate('|'),
            Err(DictionaryError::ReservedCharacter {
                group: "general",
                entry: "a|b",
                reserved: '|',
            })
        );
        assert_eq!(dict.validate(';'), Ok(()));
    }
}
