//! Conversions between SQLite rows and domain types.

use crate::domain::{Note, NoteId, Tag, TagId};
use chrono::{DateTime, Utc};
use rusqlite::Row;
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};

/// Column list matching [`note_from_row`], unqualified.
pub(crate) const NOTE_COLUMNS: &str = "id, title, content, category, created_at, updated_at";

/// Column list matching [`note_from_row`], qualified with the `n` alias.
pub(crate) const NOTE_COLUMNS_N: &str =
    "n.id, n.title, n.content, n.category, n.created_at, n.updated_at";

/// Column list matching [`tag_from_row`].
pub(crate) const TAG_COLUMNS: &str = "id, name, color";

impl ToSql for NoteId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.get()))
    }
}

impl FromSql for NoteId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(NoteId::new)
    }
}

impl ToSql for TagId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.get()))
    }
}

impl FromSql for TagId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(TagId::new)
    }
}

/// Encodes a timestamp as epoch milliseconds.
pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

fn millis_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let millis: i64 = row.get(idx)?;
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp out of range: {millis}").into(),
        )
    })
}

/// Maps a row selected with [`NOTE_COLUMNS`] starting at `offset`.
pub(crate) fn note_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Note> {
    Ok(Note::builder(
        row.get::<_, String>(offset + 1)?,
        row.get::<_, String>(offset + 2)?,
    )
    .id(row.get(offset)?)
    .category(row.get::<_, String>(offset + 3)?)
    .created_at(millis_at(row, offset + 4)?)
    .updated_at(millis_at(row, offset + 5)?)
    .build())
}

/// Maps a row selected with [`TAG_COLUMNS`] starting at `offset`.
pub(crate) fn tag_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Tag> {
    let id: TagId = row.get(offset)?;
    Ok(
        Tag::with_color(row.get::<_, String>(offset + 1)?, row.get::<_, String>(offset + 2)?)
            .with_id(id),
    )
}
