//! Sample catalog used by the demonstration driver and tests.

use super::DbResult;
use crate::model::album::NewAlbum;
use log::info;
use rusqlite::{params, Connection};

/// Returns the four albums of the sample `recordings` catalog, in id order.
pub fn sample_albums() -> Vec<NewAlbum> {
    vec![
        NewAlbum::new("Blue Train", "John Coltrane", 56.99),
        NewAlbum::new("Giant Steps", "John Coltrane", 63.99),
        NewAlbum::new("Jeru", "Gerry Mulligan", 17.99),
        NewAlbum::new("Sarah Vaughan", "Sarah Vaughan", 34.98),
    ]
}

/// Inserts the sample albums when the `album` table is empty.
///
/// Returns the number of rows inserted, `0` when the table already held data.
///
/// # Side effects
/// - Writes all rows in one transaction.
/// - Emits a `db_seed` logging event.
pub fn seed_sample_albums(conn: &mut Connection) -> DbResult<usize> {
    let tx = conn.transaction()?;
    let existing: i64 = tx.query_row("SELECT COUNT(*) FROM album;", [], |row| row.get(0))?;
    if existing > 0 {
        info!("event=db_seed module=db status=skipped existing_rows={existing}");
        return Ok(0);
    }

    let albums = sample_albums();
    {
        let mut stmt =
            tx.prepare("INSERT INTO album (title, artist, price) VALUES (?1, ?2, ?3);")?;
        for album in &albums {
            stmt.execute(params![album.title, album.artist, album.price])?;
        }
    }
    tx.commit()?;

    info!(
        "event=db_seed module=db status=ok inserted_rows={}",
        albums.len()
    );
    Ok(albums.len())
}
