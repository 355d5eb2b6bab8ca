//! Course documents, scraped from the folder browser pages.

use std::path::{Path, PathBuf};

use scraper::{ElementRef, Html};
use smartschool_core::de::parse_datetime;
use smartschool_core::entities::{
    CourseCondensed, DocumentNode, FileItem, FolderItem, InternetShortcut,
};
use smartschool_core::text::{filesystem_safe_filename, parse_mime_type, parse_size_kb};

use crate::Smartschool;
use crate::error::ClientError;
use crate::html::{element_text, selector};
use crate::http::PortalRequest;

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const DOCUMENT_ROW_PREFIX: &str = "docid_";

/// A row before shortcuts are resolved.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ListingRow {
    Folder(FolderItem),
    File(FileItem),
}

/// Parse a folder page into its rows, in page order.
pub(crate) fn parse_listing(html: &str) -> Result<Vec<ListingRow>, ClientError> {
    let document = Html::parse_document(html);
    let rows = selector("div.smsc_cm_body_row")?;

    document
        .select(&rows)
        .map(|row| {
            let id = row.value().attr("id").unwrap_or_default();
            if id
                .get(..DOCUMENT_ROW_PREFIX.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(DOCUMENT_ROW_PREFIX))
            {
                parse_file_row(&row, id).map(ListingRow::File)
            } else {
                parse_folder_row(&row).map(ListingRow::Folder)
            }
        })
        .collect()
}

fn parse_file_row(row: &ElementRef<'_>, row_id: &str) -> Result<FileItem, ClientError> {
    let id = row_id[DOCUMENT_ROW_PREFIX.len()..]
        .parse::<i64>()
        .map_err(|e| ClientError::Parse(format!("bad document row id {row_id:?}: {e}")))?;

    let links = selector("a")?;
    let mut names: Vec<String> = row
        .select(&links)
        .map(|link| element_text(&link))
        .filter(|text| !text.is_empty())
        .collect();
    names.sort();
    names.dedup();
    let [name] = <[String; 1]>::try_from(names).map_err(|names| {
        ClientError::Parse(format!(
            "document {id}: expected one link text, found {names:?}"
        ))
    })?;

    let mime = selector("div.smsc_cm_body_row_block_mime")?;
    let block = row
        .select(&mime)
        .next()
        .map(|block| {
            block
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .ok_or_else(|| ClientError::Parse(format!("document {id}: no type block")))?;
    let mut parts = block.splitn(3, " - ");
    let (Some(kind), Some(size), Some(modified)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(ClientError::Parse(format!(
            "document {id}: type block {block:?} is not \"type - size - date\""
        )));
    };

    let mut download_url = None;
    let mut view_url = None;
    for link in row.select(&links) {
        let element = link.value();
        let Some(href) = element.attr("href") else {
            continue;
        };
        if element.has_class("download-link", scraper::CaseSensitivity::CaseSensitive) {
            download_url = Some(href.to_string());
        } else if element.has_class("smsc-download__link", scraper::CaseSensitivity::CaseSensitive)
        {
            view_url = Some(href.to_string());
        }
    }

    Ok(FileItem {
        id,
        name,
        mime_type: parse_mime_type(kind),
        size_kb: parse_size_kb(size)?,
        last_modified: parse_datetime(modified).ok(),
        download_url: download_url.unwrap_or_default(),
        view_url,
    })
}

fn parse_folder_row(row: &ElementRef<'_>) -> Result<FolderItem, ClientError> {
    let links = selector("a.smsc_cm_link")?;
    row.select(&links)
        .find_map(|link| {
            let href = link.value().attr("href")?;
            Some(FolderItem {
                name: element_text(&link),
                browse_url: href.to_string(),
            })
        })
        .ok_or_else(|| ClientError::Parse("folder row has no browse link".into()))
}

/// Where an `html` document points: its first iframe, else the first external
/// link, else `fallback`.
pub(crate) fn shortcut_link(html: &str, fallback: &str) -> Result<String, ClientError> {
    let document = Html::parse_document(html);
    let iframes = selector("iframe[src]")?;
    let anchors = selector("a[href]")?;

    let link = document
        .select(&iframes)
        .filter_map(|frame| frame.value().attr("src"))
        .find(|src| !src.trim().is_empty())
        .or_else(|| {
            document
                .select(&anchors)
                .filter_map(|a| a.value().attr("href"))
                .find(|href| href.starts_with("http://") || href.starts_with("https://"))
        })
        .unwrap_or(fallback)
        .trim()
        .to_string();

    if link.is_empty() {
        return Err(ClientError::Parse("shortcut document has no link".into()));
    }
    Ok(link)
}

impl Smartschool {
    /// Root document folder of a course from the top navigation.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] if the course has no id or
    /// platform id.
    pub fn course_folder(&self, course: &CourseCondensed) -> Result<FolderItem, ClientError> {
        match (course.id, course.platform_id) {
            (Some(id), Some(platform_id)) => {
                Ok(FolderItem::course_root(&course.name, id, platform_id))
            }
            _ => Err(ClientError::InvalidArgument(format!(
                "course {} has no document folder",
                course.name
            ))),
        }
    }

    /// Children of a folder: folders first, then documents, each in natural
    /// name order. `html` documents come back as shortcuts.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if a page cannot be fetched or parsed.
    pub async fn folder_contents(&self, folder: &FolderItem) -> Result<Vec<DocumentNode>, ClientError> {
        let page = self
            .send(
                PortalRequest::get(folder.browse_url.as_str())
                    .header("Accept", HTML_ACCEPT)
                    .header("Referer", self.create_url("/")),
            )
            .await?;
        let rows = parse_listing(&page.text())?;

        let mut nodes = Vec::with_capacity(rows.len());
        for row in rows {
            nodes.push(match row {
                ListingRow::Folder(folder) => DocumentNode::Folder(folder),
                ListingRow::File(file) if file.mime_type == "html" => {
                    let link = self.resolve_shortcut(&file).await?;
                    DocumentNode::Shortcut(InternetShortcut { file, link })
                }
                ListingRow::File(file) => DocumentNode::File(file),
            });
        }
        nodes.sort_by(DocumentNode::listing_order);

        tracing::debug!(folder = %folder.name, entries = nodes.len(), "listed folder");
        Ok(nodes)
    }

    async fn resolve_shortcut(&self, file: &FileItem) -> Result<String, ClientError> {
        if file.download_url.is_empty() {
            return Err(ClientError::Parse(format!(
                "shortcut {} has no download link",
                file.name
            )));
        }
        let body = self.get_bytes(&file.download_url).await?;
        shortcut_link(&String::from_utf8_lossy(&body), &file.download_url)
    }

    /// Contents of a document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Download`] for a document without download link
    /// and [`ClientError`] if the request fails.
    pub async fn download_file(&self, file: &FileItem) -> Result<Vec<u8>, ClientError> {
        if file.download_url.is_empty() {
            return Err(ClientError::Download(format!(
                "{} has no download link",
                file.name
            )));
        }
        tracing::debug!(file = %file.name, "downloading document");
        self.get_bytes(&file.download_url).await
    }

    /// Save a document at `target`, with its file name made filesystem safe.
    /// An existing file is kept unless `overwrite` is set.
    ///
    /// # Errors
    ///
    /// See [`Self::download_file`]; I/O failures are [`ClientError::Io`].
    pub async fn download_file_to(
        &self,
        file: &FileItem,
        target: &Path,
        overwrite: bool,
    ) -> Result<PathBuf, ClientError> {
        let Some(name) = target.file_name() else {
            return Err(ClientError::InvalidArgument(format!(
                "{} is not a file path",
                target.display()
            )));
        };
        let target = target.with_file_name(filesystem_safe_filename(&name.to_string_lossy()));

        if target.exists() && !overwrite {
            tracing::debug!(path = %target.display(), "already downloaded");
            return Ok(target);
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = self.download_file(file).await?;
        std::fs::write(&target, bytes)?;
        Ok(target)
    }

    /// Save a document into `dir` under [`FileItem::filename`].
    ///
    /// # Errors
    ///
    /// See [`Self::download_file_to`].
    pub async fn download_file_to_dir(
        &self,
        file: &FileItem,
        dir: &Path,
        overwrite: bool,
    ) -> Result<PathBuf, ClientError> {
        self.download_file_to(file, &dir.join(file.filename()), overwrite)
            .await
    }

    /// Save a listed document or shortcut into `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for folders, otherwise see
    /// [`Self::download_file_to`].
    pub async fn download_node_to_dir(
        &self,
        node: &DocumentNode,
        dir: &Path,
        overwrite: bool,
    ) -> Result<PathBuf, ClientError> {
        match node {
            DocumentNode::File(file) => self.download_file_to_dir(file, dir, overwrite).await,
            DocumentNode::Shortcut(shortcut) => Ok(shortcut.write_to(dir, overwrite)?),
            DocumentNode::Folder(folder) => Err(ClientError::InvalidArgument(format!(
                "{} is a folder",
                folder.name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LISTING: &str = r#"<html><body><div id="smsc_cm_body">
        <div class="smsc_cm_body_row" id="folder_12">
            <a class="smsc_cm_link" href="/Documents/Index/Index/courseID/4128/ssID/49/parentID/12">
                Thema 1
            </a>
        </div>
        <div class="smsc_cm_body_row" id="DOCID_331">
            <div class="smsc_cm_body_row_block">
                <a class="download-link" href="/Documents/Download/Index/htm/0/courseID/4128/docID/331/ssID/49">Cursus</a>
                <a class="smsc-download__link" href="/Documents/Wopi/Index/docID/331">Cursus</a>
            </div>
            <div class="smsc_cm_body_row_block_mime">
                PDF-bestand - 75,54 KB - <span>2023-11-15 10:12</span>
            </div>
        </div>
    </div></body></html>"#;

    #[test]
    fn parses_folders_and_files() {
        let rows = parse_listing(LISTING).unwrap();
        assert_eq!(rows.len(), 2);

        let ListingRow::Folder(folder) = &rows[0] else {
            panic!("expected a folder, got {:?}", rows[0]);
        };
        assert_eq!(folder.name, "Thema 1");
        assert_eq!(
            folder.browse_url,
            "/Documents/Index/Index/courseID/4128/ssID/49/parentID/12"
        );

        let ListingRow::File(file) = &rows[1] else {
            panic!("expected a file, got {:?}", rows[1]);
        };
        assert_eq!(file.id, 331);
        assert_eq!(file.name, "Cursus");
        assert_eq!(file.mime_type, "pdf");
        assert!((file.size_kb - 75.54).abs() < 1e-9);
        assert!(file.last_modified.is_some());
        assert_eq!(
            file.download_url,
            "/Documents/Download/Index/htm/0/courseID/4128/docID/331/ssID/49"
        );
        assert_eq!(file.view_url.as_deref(), Some("/Documents/Wopi/Index/docID/331"));
    }

    #[test]
    fn non_ascii_row_id_is_a_folder() {
        let html = r#"<div class="smsc_cm_body_row" id="map_€1">
            <a class="smsc_cm_link" href="/x">Map</a></div>"#;
        let rows = parse_listing(html).unwrap();
        assert_eq!(
            rows,
            [ListingRow::Folder(FolderItem {
                name: "Map".into(),
                browse_url: "/x".into(),
            })]
        );

        let short = r#"<div class="smsc_cm_body_row" id="é"><a class="smsc_cm_link" href="/y">Y</a></div>"#;
        assert!(matches!(parse_listing(short).unwrap()[..], [ListingRow::Folder(_)]));
    }

    #[test]
    fn ambiguous_link_text_is_rejected() {
        let html = r#"<div class="smsc_cm_body_row" id="docid_1">
            <a href="/a">One</a><a href="/b">Two</a>
            <div class="smsc_cm_body_row_block_mime">PDF - 1 KB - 2023-11-15 10:12</div>
        </div>"#;
        assert!(matches!(parse_listing(html), Err(ClientError::Parse(_))));
    }

    #[test]
    fn unknown_date_is_tolerated() {
        let html = r#"<div class="smsc_cm_body_row" id="docid_7">
            <a class="download-link" href="/d/7">Notes</a>
            <div class="smsc_cm_body_row_block_mime">DOCX - 1,2 MB - gisteren</div>
        </div>"#;
        let rows = parse_listing(html).unwrap();
        let ListingRow::File(file) = &rows[0] else {
            panic!("expected a file");
        };
        assert_eq!(file.mime_type, "docx");
        assert!(file.last_modified.is_none());
        assert!((file.size_kb - 1228.8).abs() < 1e-9);
    }

    #[test]
    fn folder_row_without_link_is_an_error() {
        let html = r#"<div class="smsc_cm_body_row"><span>empty</span></div>"#;
        assert!(matches!(parse_listing(html), Err(ClientError::Parse(_))));
    }

    #[test]
    fn shortcut_prefers_iframe_then_external_anchor() {
        let framed = r#"<iframe src="https://video.example/embed/1"></iframe>
                        <a href="https://other.example">x</a>"#;
        assert_eq!(shortcut_link(framed, "/dl").unwrap(), "https://video.example/embed/1");

        let anchored = r#"<a href="/internal">in</a><a href="https://site.example/page">out</a>"#;
        assert_eq!(shortcut_link(anchored, "/dl").unwrap(), "https://site.example/page");

        assert_eq!(shortcut_link("<p>nothing</p>", "/dl").unwrap(), "/dl");
        assert!(shortcut_link("<p>nothing</p>", "").is_err());
    }
}
