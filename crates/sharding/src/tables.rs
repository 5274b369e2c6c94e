use std::fmt;

use serde::Serialize;

use crate::error::{Result, ShardError};
use crate::fields::Record;
use crate::partition::{Classifier, RecordContext, Route, Shard, ShardKeys};

pub const UID_INDEX_IN_USER: usize = 2;
pub const REGION_INDEX_IN_USER: usize = 10;

pub const AID_INDEX_IN_ARTICLE: usize = 2;
pub const CATEGORY_INDEX_IN_ARTICLE: usize = 4;

pub const UID_INDEX_IN_USER_READ: usize = 2;

pub const SHARD1_REGION: &str = "\"Beijing\"";
pub const SHARD2_REGION: &str = "\"Hong Kong\"";
pub const SHARD2_CATEGORY: &str = "\"technology\"";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    User,
    Article,
    UserRead,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Table::User => "user",
            Table::Article => "article",
            Table::UserRead => "user_read",
        })
    }
}

/// Users go to the shard of their region; only two regions exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserRegion;

impl Classifier for UserRegion {
    fn key_index(&self) -> usize {
        UID_INDEX_IN_USER
    }

    fn route(&self, record: &Record<'_>, ctx: &RecordContext<'_>) -> Result<Route> {
        let region = ctx.field(record, REGION_INDEX_IN_USER, "region")?;
        match region {
            SHARD1_REGION => Ok(Route::Only(Shard::One)),
            SHARD2_REGION => Ok(Route::Only(Shard::Two)),
            _ => Err(ShardError::UnrecognizedRegion {
                path: ctx.source.to_path_buf(),
                line: ctx.line,
                uid: ctx.field(record, UID_INDEX_IN_USER, "uid")?.to_string(),
                region: region.to_string(),
            }),
        }
    }
}

/// Every article lives in shard 1; technology articles are replicated to shard 2.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticleCategory;

impl Classifier for ArticleCategory {
    fn key_index(&self) -> usize {
        AID_INDEX_IN_ARTICLE
    }

    fn route(&self, record: &Record<'_>, ctx: &RecordContext<'_>) -> Result<Route> {
        let category = ctx.field(record, CATEGORY_INDEX_IN_ARTICLE, "category")?;
        Ok(if category == SHARD2_CATEGORY {
            Route::Both
        } else {
            Route::Only(Shard::One)
        })
    }
}

/// Read events follow the shard their user was assigned to.
#[derive(Debug, Clone, Copy)]
pub struct UserReadAssignment<'k> {
    users: &'k ShardKeys,
}

impl<'k> UserReadAssignment<'k> {
    pub fn new(users: &'k ShardKeys) -> Self {
        Self { users }
    }
}

impl Classifier for UserReadAssignment<'_> {
    fn key_index(&self) -> usize {
        UID_INDEX_IN_USER_READ
    }

    fn route(&self, record: &Record<'_>, ctx: &RecordContext<'_>) -> Result<Route> {
        let uid = ctx.field(record, UID_INDEX_IN_USER_READ, "uid")?;
        self.users
            .assignment(uid)
            .map(Route::Only)
            .ok_or_else(|| ShardError::UnassignedKey {
                path: ctx.source.to_path_buf(),
                line: ctx.line,
                uid: uid.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::line_io::split_lines;
    use crate::partition::{partition, Partition};
    use crate::region::Regions;

    fn user(uid: &str, region: &str, end: &str) -> String {
        format!(
            "(\"1506328859000\", \"id\", \"{uid}\", \"name\", \"male\", \"email\", \"phone\", \
             \"dept\", \"grade\", \"en\", \"{region}\", \"role\", \"tags\", \"10\"){end}\n"
        )
    }

    fn run<'a, C: Classifier>(lines: &'a [String], classifier: &C) -> Result<Partition<'a>> {
        let source = Path::new("user.sql");
        let regions = Regions::scan(lines, source)?;
        partition(&regions, classifier, source)
    }

    fn dump(records: &[String]) -> Vec<String> {
        let mut content = String::from("INSERT INTO `user` VALUES\n");
        content.extend(records.iter().cloned());
        split_lines(&content)
    }

    #[test]
    fn users_split_by_region() {
        let lines = dump(&[user("u1", "Beijing", ","), user("u2", "Hong Kong", ";")]);
        let out = run(&lines, &UserRegion).unwrap();
        assert_eq!(out.keys.assignment("\"u1\""), Some(Shard::One));
        assert_eq!(out.keys.assignment("\"u2\""), Some(Shard::Two));
        assert_eq!(out.keys.get(Shard::One).len(), 1);
        assert_eq!(out.keys.get(Shard::Two).len(), 1);
        assert_eq!(out.lines(Shard::One)[1], lines[1]);
        assert_eq!(out.lines(Shard::Two)[1], lines[2]);
    }

    #[test]
    fn user_in_two_regions_is_visible_in_overlap() {
        let lines = dump(&[user("u1", "Beijing", ","), user("u1", "Hong Kong", ";")]);
        let out = run(&lines, &UserRegion).unwrap();
        assert_eq!(out.keys.overlap().collect::<Vec<_>>(), vec!["\"u1\""]);
        assert_eq!(out.keys.assignment("\"u1\""), Some(Shard::One));
    }

    #[test]
    fn unknown_region_names_user_and_line() {
        let lines = dump(&[user("u1", "Beijing", ","), user("u3", "Shanghai", ";")]);
        match run(&lines, &UserRegion).unwrap_err() {
            ShardError::UnrecognizedRegion {
                line, uid, region, ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(uid, "\"u3\"");
                assert_eq!(region, "\"Shanghai\"");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn region_match_is_exact() {
        let lines = dump(&[user("u1", "beijing", ";")]);
        assert!(matches!(
            run(&lines, &UserRegion),
            Err(ShardError::UnrecognizedRegion { .. })
        ));
    }

    #[test]
    fn technology_articles_land_in_both_shards() {
        let lines = split_lines(
            "INSERT INTO `article` VALUES\n\
             (\"t\", \"i\", \"a1\", \"title\", \"technology\", \"x\"),\n\
             (\"t\", \"i\", \"a2\", \"title\", \"sports\", \"x\");\n",
        );
        let out = run(&lines, &ArticleCategory).unwrap();
        assert_eq!(out.record_count(Shard::One), 2);
        assert_eq!(out.record_count(Shard::Two), 1);
        assert!(out.keys.get(Shard::Two).is_subset(out.keys.get(Shard::One)));
        assert!(out.keys.get(Shard::Two).contains("\"a1\""));
        assert!(!out.keys.get(Shard::Two).contains("\"a2\""));
    }

    #[test]
    fn reads_follow_user_assignment() {
        let users = dump(&[user("u1", "Beijing", ","), user("u2", "Hong Kong", ";")]);
        let user_keys = run(&users, &UserRegion).unwrap().keys;

        let reads = split_lines(
            "INSERT INTO `user_read` VALUES\n\
             (\"t\", \"r1\", \"u2\", \"a1\"),\n\
             (\"t\", \"r2\", \"u1\", \"a1\");\n",
        );
        let out = run(&reads, &UserReadAssignment::new(&user_keys)).unwrap();
        assert_eq!(out.lines(Shard::One)[1], reads[2]);
        assert_eq!(out.lines(Shard::Two)[1], reads[1]);
        assert_eq!(out.record_count(Shard::One), 1);
        assert_eq!(out.record_count(Shard::Two), 1);
    }

    #[test]
    fn read_of_unknown_user_fails() {
        let user_keys = ShardKeys::default();
        let reads = split_lines("INSERT INTO `user_read` VALUES\n(\"t\", \"r1\", \"u9\", \"a1\");\n");
        match run(&reads, &UserReadAssignment::new(&user_keys)).unwrap_err() {
            ShardError::UnassignedKey { line, uid, .. } => {
                assert_eq!(line, 2);
                assert_eq!(uid, "\"u9\"");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn table_names() {
        assert_eq!(Table::UserRead.to_string(), "user_read");
        assert_eq!(Table::User.to_string(), "user");
    }
}
