use lazy_static::lazy_static;
use regex::Regex;

pub const DEFAULT_TAG: &str = "latest";

/// One row of the runtime's image listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Image {
    pub repository: String,
    pub tag: String,
    pub id: String,
    pub created: String,
    pub size: String,
}

impl Image {
    /// Builds an image from listing columns in `REPOSITORY TAG IMAGE ID
    /// CREATED SIZE` order. Missing columns are left empty, a missing tag
    /// becomes `latest`.
    pub fn from_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Self {
        let mut columns = columns.into_iter().map(str::to_string);
        let repository = columns.next().unwrap_or_default();
        let tag = columns
            .next()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TAG.to_string());

        Self {
            repository,
            tag,
            id: columns.next().unwrap_or_default(),
            created: columns.next().unwrap_or_default(),
            size: columns.next().unwrap_or_default(),
        }
    }

    pub fn name(&self) -> String {
        format!("{}:{}", self.repository, self.tag)
    }
}

/// Parses the tabular output of `docker images`.
///
/// The first line is the header. Columns are separated by two or more
/// whitespace characters, so single spaces inside a column (`2 weeks ago`)
/// survive.
pub fn parse_image_listing(listing: &str) -> Vec<Image> {
    listing
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| Image::from_columns(split_columns(line)))
        .collect()
}

fn split_columns(line: &str) -> Vec<&str> {
    lazy_static! {
        static ref COLUMN_SEPARATOR: Regex = Regex::new(r"\s{2,}").unwrap();
    }
    COLUMN_SEPARATOR.split(line.trim_end()).collect()
}

/// Splits `name` into repository and tag, applying the default tag.
///
/// Returns `None` when the repository part is empty.
pub fn split_image_name(name: &str) -> Option<(&str, &str)> {
    let mut parts = name.split(':');
    let repository = parts.next().filter(|r| !r.is_empty())?;
    let tag = parts.next().filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TAG);
    Some((repository, tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
REPOSITORY          TAG                 IMAGE ID            CREATED             SIZE
oswitch_samtools    latest              1a2b3c4d5e6f        2 weeks ago         412MB
yeban/biolinux      8                   0f9e8d7c6b5a        3 months ago        2.1GB
<none>              <none>              deadbeef0000        5 days ago          120MB
";

    #[test]
    fn test_parse_listing() {
        let images = parse_image_listing(LISTING);
        assert_eq!(images.len(), 3);

        assert_eq!(
            images[0],
            Image {
                repository: "oswitch_samtools".to_string(),
                tag: "latest".to_string(),
                id: "1a2b3c4d5e6f".to_string(),
                created: "2 weeks ago".to_string(),
                size: "412MB".to_string(),
            }
        );
        assert_eq!(images[1].name(), "yeban/biolinux:8");
        assert_eq!(images[2].repository, "<none>");
    }

    #[test]
    fn test_parse_header_only() {
        assert!(parse_image_listing("REPOSITORY   TAG   IMAGE ID   CREATED   SIZE\n").is_empty());
        assert!(parse_image_listing("").is_empty());
    }

    #[test]
    fn test_split_columns_single_space_kept() {
        assert_eq!(
            split_columns("a b  c\t\td   "),
            vec!["a b", "c", "d"]
        );
    }

    #[test]
    fn test_missing_tag_defaults_to_latest() {
        let image = Image::from_columns(["busybox"]);
        assert_eq!(image.tag, "latest");
        assert_eq!(image.id, "");
    }

    #[test]
    fn test_split_image_name() {
        assert_eq!(split_image_name("repo"), Some(("repo", "latest")));
        assert_eq!(split_image_name("repo:"), Some(("repo", "latest")));
        assert_eq!(split_image_name("repo:tagX"), Some(("repo", "tagX")));
        assert_eq!(split_image_name(":tag"), None);
        assert_eq!(split_image_name(""), None);
    }
}
