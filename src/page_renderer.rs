use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::debug;
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

use crate::{
    config::OutputConfig,
    error::CrawlError,
    lecture_descriptor::LectureRecord,
    text_manipulators::{escape_html, fill_placeholders},
    unit_descriptor::UnitRecord,
};

/// The two page templates, read once per run.
#[derive(Debug, Clone)]
pub struct Templates {
    pub unit_list: String,
    pub unit_page: String,
}

impl Templates {
    pub async fn load(output: &OutputConfig) -> Result<Self, CrawlError> {
        let unit_list = read_template(&output.unit_list_template).await?;
        let unit_page = read_template(&output.unit_template).await?;
        Ok(Self {
            unit_list,
            unit_page,
        })
    }
}

async fn read_template(path: &Path) -> Result<String, CrawlError> {
    fs::read_to_string(path)
        .await
        .map_err(|e| CrawlError::io(path, e))
}

fn full_year(year: &str) -> String {
    format!("20{year}")
}

/// One row of the unit list: code, link to the unit's page, link to its portal.
pub fn render_unit_entry(unit: &UnitRecord, unit_dir_href: &str) -> String {
    let code = escape_html(&unit.unit_code);
    format!(
        r#"
        <div class="row">
            <div class="col-md-4"></div>
            <div class="col-md-1">{code}:</div>
            <div class="col-md-3">
                <div class="col-md-4"><a href="{dir}/{code}.html">Downloads</a></div>
                <div class="col-md-4"><a href="{portal}">Echo</a></div>
            </div>
            <div class="col-md-4"></div>
        </div>
        "#,
        dir = escape_html(unit_dir_href),
        portal = escape_html(&unit.portal_url),
    )
}

pub fn render_unit_list_page(
    units: &[UnitRecord],
    template: &str,
    year: &str,
    semester: &str,
    unit_dir_href: &str,
) -> String {
    let mut page = fill_placeholders(template, &[("semester", semester), ("year", &full_year(year))]);
    for unit in units {
        page.push_str(&render_unit_entry(unit, unit_dir_href));
    }
    page
}

/// Unit pages keep the two-digit year; only the list page spells it out.
pub fn render_unit_page(unit_code: &str, template: &str, year: &str, semester: &str) -> String {
    fill_placeholders(
        template,
        &[
            ("pageTitle", unit_code),
            ("semester", semester),
            ("year", year),
        ],
    )
}

/// True if `unit_code` can name a file directly inside the unit directory.
pub fn is_page_name(unit_code: &str) -> bool {
    !unit_code.is_empty()
        && unit_code != "."
        && !unit_code.contains("..")
        && !unit_code.contains(['/', '\\', ':', '\0'])
}

pub fn render_lecture_entry(lecture: &LectureRecord) -> String {
    format!(
        r#"

        <div class="row">
            <div class="col-sm-3"></div>
            <div class="col-sm-2">
                <div class="col-sm-12">{time}</div>
                <div class="col-sm-12">{date}</div>
            </div>
            <div class="col-sm-4">
                <div class="col-sm-12">{location}</div>
            </div>
            <div class="col-sm-2">
                <div class="col-sm-12"><a download="download.m4v" href="{video}">Download</a></div>
            </div>
            <div class="col-sm-1"></div>
        </div>

        <div class="row">
            <div class="col-sm-12">&nbsp;</div>
        </div>

        "#,
        time = lecture.time_label(),
        date = lecture.date_label(),
        location = escape_html(&lecture.location),
        video = escape_html(&lecture.video_url),
    )
}

/// Writes the unit list and per-unit pages under the configured output paths.
///
/// Every write to a unit page goes through that page's lock, so a page being
/// regenerated is never appended to at the same time.
pub struct PageRenderer {
    output: OutputConfig,
    page_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PageRenderer {
    pub fn new(output: OutputConfig) -> Self {
        Self {
            output,
            page_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    pub fn unit_page_path(&self, unit_code: &str) -> PathBuf {
        self.output.unit_dir.join(format!("{unit_code}.html"))
    }

    /// Link prefix used by the list page to reach unit pages.
    pub fn unit_dir_href(&self) -> String {
        self.output.unit_dir.to_string_lossy().replace('\\', "/")
    }

    async fn page_lock(&self, unit_code: &str) -> Arc<Mutex<()>> {
        let mut locks = self.page_locks.lock().await;
        locks.entry(unit_code.to_string()).or_default().clone()
    }

    pub async fn unit_page_exists(&self, unit_code: &str) -> bool {
        fs::metadata(self.unit_page_path(unit_code))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    pub async fn write_unit_list(&self, content: &str) -> Result<(), CrawlError> {
        let path = &self.output.unit_list_file;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CrawlError::io(parent, e))?;
        }
        fs::write(path, content)
            .await
            .map_err(|e| CrawlError::io(path, e))
    }

    /// Creates or overwrites a unit's page.
    pub async fn write_unit_page(&self, unit_code: &str, content: &str) -> Result<(), CrawlError> {
        let dir = &self.output.unit_dir;
        fs::create_dir_all(dir)
            .await
            .map_err(|e| CrawlError::io(dir, e))?;

        let path = self.unit_page_path(unit_code);
        let lock = self.page_lock(unit_code).await;
        let _guard = lock.lock().await;
        fs::write(&path, content)
            .await
            .map_err(|e| CrawlError::io(&path, e))
    }

    /// Appends one lecture entry to an existing unit page. The page must exist.
    pub async fn append_lecture(
        &self,
        unit_code: &str,
        lecture: &LectureRecord,
    ) -> Result<(), CrawlError> {
        let path = self.unit_page_path(unit_code);
        let entry = render_lecture_entry(lecture);

        let lock = self.page_lock(unit_code).await;
        let _guard = lock.lock().await;
        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .await
            .map_err(|e| CrawlError::io(&path, e))?;
        file.write_all(entry.as_bytes())
            .await
            .map_err(|e| CrawlError::io(&path, e))?;
        file.flush().await.map_err(|e| CrawlError::io(&path, e))?;
        debug!("appended {} to {}", lecture.video_url, path.display());
        Ok(())
    }
}
