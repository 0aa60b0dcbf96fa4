//! Whole-document rewrites applied to raw post HTML before parsing.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::config::AssetPathConfig;

/// Character inserted into every iframe so the converter does not drop it as
/// blank. [`crate::finalize`] removes it again.
pub const IFRAME_PLACEHOLDER: char = '.';

static DOUBLE_LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\r?\n){2}").expect("line break pattern is valid"));

// Only the value of `src` is touched; a trailing query string or fragment
// survives.
static IMAGE_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(<img[^>]*\ssrc=")[^"]*?([^/"]+\.(?:gif|jpe?g|png|svg|webp))((?:[?#][^"]*)?)("[^>]*>)"#,
    )
    .expect("image pattern is valid")
});

static PDF_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(<a[^>]*\shref=")[^"]*?([^/"]+\.pdf)("[^>]*>)"#)
        .expect("pdf pattern is valid")
});

static IFRAME_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</iframe>").expect("iframe pattern is valid"));

/// Prepare raw post HTML for conversion.
///
/// 1. A blank line becomes `\n<div></div>\n`. The empty block forces a
///    paragraph break where the converter would otherwise collapse the
///    blank line into a space, and leaves text inside code blocks as is.
/// 2. With asset rewriting on, image and PDF references are pointed at
///    the local assets directory.
/// 3. Every `</iframe>` gets [`IFRAME_PLACEHOLDER`] in front of it.
pub fn prepare(raw_html: &str, config: &AssetPathConfig) -> String {
    let mut content = DOUBLE_LINE_BREAK
        .replace_all(raw_html, "\n<div></div>\n")
        .into_owned();

    if let Some(assets_dir) = config.assets_dir() {
        tracing::debug!(assets_dir = %assets_dir, "Rewriting asset references");
        content = rewrite_asset_paths(&content, &assets_dir);
    }

    IFRAME_CLOSE
        .replace_all(&content, |caps: &Captures| format!("{}{}", IFRAME_PLACEHOLDER, &caps[0]))
        .into_owned()
}

/// Point image `src` and PDF `href` values at `assets_dir`
pub fn rewrite_asset_paths(html: &str, assets_dir: &str) -> String {
    let html = IMAGE_SRC.replace_all(html, |caps: &Captures| {
        format!("{}{}/images/{}{}{}", &caps[1], assets_dir, &caps[2], &caps[3], &caps[4])
    });
    PDF_HREF
        .replace_all(&html, |caps: &Captures| {
            format!("{}{}/{}{}", &caps[1], assets_dir, &caps[2], &caps[3])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rewriting(post_folders: bool) -> AssetPathConfig {
        AssetPathConfig {
            save_scraped_images: true,
            post_folders,
            assets: "assets".to_string(),
        }
    }

    #[test]
    fn test_blank_line_becomes_empty_div() {
        let config = AssetPathConfig::default();
        assert_eq!(prepare("a\n\nb", &config), "a\n<div></div>\nb");
        assert_eq!(prepare("a\r\n\r\nb", &config), "a\n<div></div>\nb");
        assert_eq!(prepare("a\nb", &config), "a\nb");
    }

    #[test]
    fn test_three_line_breaks_keep_one() {
        let config = AssetPathConfig::default();
        assert_eq!(prepare("a\n\n\nb", &config), "a\n<div></div>\n\nb");
    }

    #[test]
    fn test_image_rewritten_to_shared_assets() {
        let html = r#"<img src="http://example.com/path/photo.JPG">"#;
        assert_eq!(
            prepare(html, &rewriting(false)),
            r#"<img src="./assets/images/photo.JPG">"#
        );
    }

    #[test]
    fn test_image_rewritten_to_post_folder() {
        let html = r#"<img class="wp-image-12" src="https://example.com/wp-content/uploads/2020/01/cat.png" alt="Cat">"#;
        assert_eq!(
            prepare(html, &rewriting(true)),
            r#"<img class="wp-image-12" src="./images/cat.png" alt="Cat">"#
        );
    }

    #[test]
    fn test_image_query_string_survives() {
        let html = r#"<img src="https://example.com/uploads/cat.webp?w=300&h=200" alt="Cat">"#;
        assert_eq!(
            prepare(html, &rewriting(false)),
            r#"<img src="./assets/images/cat.webp?w=300&h=200" alt="Cat">"#
        );
    }

    #[test]
    fn test_rewrite_stays_inside_one_tag() {
        let html = r#"<img src="https://example.com/chart.php"><img src="https://example.com/b.gif">"#;
        assert_eq!(
            prepare(html, &rewriting(false)),
            r#"<img src="https://example.com/chart.php"><img src="./assets/images/b.gif">"#
        );
    }

    #[test]
    fn test_pdf_link_rewritten() {
        let html = r#"<a href="https://example.com/files/Guide.PDF">Guide</a> <a href="https://example.com/page">Page</a>"#;
        assert_eq!(
            prepare(html, &rewriting(false)),
            r#"<a href="./assets/Guide.PDF">Guide</a> <a href="https://example.com/page">Page</a>"#
        );
    }

    #[test]
    fn test_no_rewrite_when_disabled() {
        let html = r#"<img src="http://example.com/path/photo.jpg">"#;
        assert_eq!(prepare(html, &AssetPathConfig::default()), html);
    }

    #[test]
    fn test_iframe_gets_placeholder() {
        let config = AssetPathConfig::default();
        assert_eq!(
            prepare(r#"<iframe src="x"></iframe><IFRAME src="y"></IFRAME>"#, &config),
            r#"<iframe src="x">.</iframe><IFRAME src="y">.</IFRAME>"#
        );
    }
}
