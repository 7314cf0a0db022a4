//! Cosine similarity, embedding BLOB encoding, and the SQL functions registered on every connection.

use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::Connection;

/// Name under which the similarity function is registered.
pub const SIMILARITY_FUNCTION: &str = "cosine_similarity";

/// Unicode lowercasing for case-insensitive text predicates.
///
/// SQLite's `LIKE` only folds ASCII, so "ÉGALITÉ" would not match "égalité".
pub const CASEFOLD_FUNCTION: &str = "casefold";

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 for empty inputs, mismatched lengths, or a zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Pack a vector as little-endian f32 bytes.
pub fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Unpack little-endian f32 bytes. Trailing bytes that do not form a full f32 are ignored.
pub fn decode_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn blob_arg(value: ValueRef<'_>) -> Option<Vec<f32>> {
    match value {
        ValueRef::Blob(bytes) if bytes.len() % 4 == 0 => Some(decode_embedding(bytes)),
        _ => None,
    }
}

fn probe(conn: &Connection, sql: &str) -> bool {
    conn.query_row(sql, [], |row| row.get::<_, rusqlite::types::Value>(0))
        .is_ok()
}

/// Whether `cosine_similarity` is already callable on this connection.
pub fn is_registered(conn: &Connection) -> bool {
    probe(conn, &format!("SELECT {}(x'', x'')", SIMILARITY_FUNCTION))
}

/// Whether `casefold` is already callable on this connection.
pub fn is_casefold_registered(conn: &Connection) -> bool {
    probe(conn, &format!("SELECT {}('')", CASEFOLD_FUNCTION))
}

/// Register `cosine_similarity(blob, blob) -> real` and `casefold(text) -> text`
/// unless they already exist.
///
/// Returns `true` when any new registration was made. Non-BLOB or malformed
/// similarity arguments evaluate to 0.0 rather than raising; `casefold` passes
/// NULL through.
pub fn register(conn: &Connection) -> rusqlite::Result<bool> {
    let mut registered = false;

    if is_registered(conn) {
        tracing::debug!(function = SIMILARITY_FUNCTION, "Similarity function already registered");
    } else {
        conn.create_scalar_function(
            SIMILARITY_FUNCTION,
            2,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let score = match (blob_arg(ctx.get_raw(0)), blob_arg(ctx.get_raw(1))) {
                    (Some(a), Some(b)) => cosine_similarity(&a, &b),
                    _ => 0.0,
                };
                Ok(f64::from(score))
            },
        )?;
        tracing::info!(function = SIMILARITY_FUNCTION, "Registered similarity function");
        registered = true;
    }

    if !is_casefold_registered(conn) {
        conn.create_scalar_function(
            CASEFOLD_FUNCTION,
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let folded = match ctx.get_raw(0) {
                    ValueRef::Null => None,
                    ValueRef::Integer(i) => Some(i.to_string()),
                    ValueRef::Real(f) => Some(f.to_string()),
                    ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                        Some(String::from_utf8_lossy(bytes).to_lowercase())
                    }
                };
                Ok(folded)
            },
        )?;
        tracing::debug!(function = CASEFOLD_FUNCTION, "Registered casefold function");
        registered = true;
    }

    Ok(registered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_degenerate_inputs_are_zero() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_self_similarity_and_bounds() {
        let v: Vec<f32> = (0..384).map(|i| ((i * 37 % 101) as f32 / 50.0) - 1.0).collect();
        let w: Vec<f32> = (0..384).map(|i| ((i * 11 % 97) as f32 / 48.0) - 1.0).collect();
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-5);
        let s = cosine_similarity(&v, &w);
        assert!((-1.0..=1.0).contains(&s));
    }

    #[test]
    fn test_blob_encoding() {
        let v = vec![0.25_f32, -1.0, 3.5];
        let bytes = encode_embedding(&v);
        assert_eq!(bytes.len(), 12);
        assert_eq!(decode_embedding(&bytes), v);
    }

    #[test]
    fn test_sql_function_registers_once() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!is_registered(&conn));
        assert!(register(&conn).unwrap());
        assert!(is_registered(&conn));
        assert!(!register(&conn).unwrap());

        let a = encode_embedding(&[1.0, 0.0]);
        let b = encode_embedding(&[1.0, 0.0]);
        let score: f64 = conn
            .query_row("SELECT cosine_similarity(?1, ?2)", rusqlite::params![a, b], |r| r.get(0))
            .unwrap();
        assert!((score - 1.0).abs() < 1e-6);

        let text_arg: f64 = conn
            .query_row("SELECT cosine_similarity('abc', ?1)", [a], |r| r.get(0))
            .unwrap();
        assert_eq!(text_arg, 0.0);
    }

    #[test]
    fn test_casefold_function_folds_unicode() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!is_casefold_registered(&conn));
        register(&conn).unwrap();
        assert!(is_casefold_registered(&conn));

        let folded: String = conn
            .query_row("SELECT casefold(?1)", ["CÔTE D'IVOIRE ÉGALITÉ"], |r| r.get(0))
            .unwrap();
        assert_eq!(folded, "côte d'ivoire égalité");

        let null: Option<String> = conn
            .query_row("SELECT casefold(NULL)", [], |r| r.get(0))
            .unwrap();
        assert!(null.is_none());
    }
}
