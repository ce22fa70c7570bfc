use futures::stream::{self, StreamExt};
use log::{info, warn};

use crate::{
    directory_lister::list_hashes,
    error::CrawlError,
    page_renderer::{PageRenderer, Templates, render_unit_list_page, render_unit_page},
    scraping_context::CrawlContext,
    unit_descriptor::{UnitRecord, fetch_unit},
};

/// Every standard unit offered in `semester` of `year` (two digits), sorted by
/// unit code with one record per code.
///
/// The server has no filtered query, so this reads the descriptor of every unit
/// it has ever hosted. A failed listing aborts the crawl; a failed descriptor
/// only skips that unit.
pub async fn crawl_semester(
    ctx: &CrawlContext,
    year: &str,
    semester: &str,
) -> Result<Vec<UnitRecord>, CrawlError> {
    info!("Finding units from semester {semester} 20{year}");
    let sections_url = ctx.crawl_config.sections_url();
    let hashes = list_hashes(ctx, &sections_url).await?;
    info!("{} unit descriptors listed", hashes.len());

    let results: Vec<_> = stream::iter(&hashes)
        .map(|hash| fetch_unit(ctx, hash))
        .buffer_unordered(ctx.crawl_config.concurrency())
        .collect()
        .await;

    let mut skipped = 0;
    let mut units = Vec::new();
    for result in results {
        match result {
            Ok(unit) => {
                let wanted = unit.year == year
                    && unit.semester.as_deref() == Some(semester)
                    && ctx.unit_code_filter.is_unit_code(&unit.unit_code);
                if wanted {
                    units.push(unit);
                }
            }
            Err(e) => {
                warn!("skipping unit: {e}");
                skipped += 1;
            }
        }
    }

    units.sort_by(|a, b| a.unit_code.cmp(&b.unit_code));
    units.dedup_by(|a, b| a.unit_code == b.unit_code);

    info!(
        "Fetched {} units ({} of {} descriptors unreadable)",
        units.len(),
        skipped,
        hashes.len()
    );
    Ok(units)
}

/// Crawls a semester and writes the unit list plus a fresh page for every unit.
///
/// Existing unit pages are overwritten, dropping any lectures appended to them.
/// All pages are on disk by the time this returns.
pub async fn publish_semester(
    ctx: &CrawlContext,
    renderer: &PageRenderer,
    templates: &Templates,
    year: &str,
    semester: &str,
) -> Result<Vec<UnitRecord>, CrawlError> {
    let units = crawl_semester(ctx, year, semester).await?;

    info!("Writing {} units to {}", units.len(), renderer.output().unit_list_file.display());
    let list_page = render_unit_list_page(
        &units,
        &templates.unit_list,
        year,
        semester,
        &renderer.unit_dir_href(),
    );
    renderer.write_unit_list(&list_page).await?;

    for unit in &units {
        let page = render_unit_page(&unit.unit_code, &templates.unit_page, year, semester);
        renderer.write_unit_page(&unit.unit_code, &page).await?;
    }

    Ok(units)
}
