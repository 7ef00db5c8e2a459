//! SQL statements for the supported databases.
//!
//! Connection types and directions are stored as integer codes
//! (see [`v2stat_core::ConnType::code`] and [`v2stat_core::Direction::code`]).

/// Statement set for one database dialect.
#[derive(Debug)]
pub(crate) struct Queries {
    /// Schema statements, executed in order.
    pub schema: &'static [&'static str],
    /// Insert a connection unless `(type, name)` already exists.
    pub insert_conn: &'static str,
    /// Look up the id of a connection by `(type, name)`.
    pub select_conn_id: &'static str,
    /// Append one traffic sample.
    pub insert_stat: &'static str,
    /// List all connections.
    pub select_conns: &'static str,
    /// Hourly totals for one connection. Binds: offset, type, name.
    pub hourly_stats: &'static str,
}

pub(crate) static SQLITE: Queries = Queries {
    schema: &[
        r#"
        CREATE TABLE IF NOT EXISTS conn (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            type INTEGER NOT NULL,
            name TEXT NOT NULL,
            UNIQUE (type, name)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS stats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            conn_id INTEGER NOT NULL,
            timestamp INTEGER NOT NULL,
            traffic INTEGER NOT NULL,
            direction INTEGER NOT NULL,
            FOREIGN KEY (conn_id) REFERENCES conn (id)
                ON DELETE CASCADE
                ON UPDATE CASCADE
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_conn_id ON stats (conn_id)",
        "CREATE INDEX IF NOT EXISTS idx_timestamp ON stats (timestamp)",
    ],
    insert_conn: "INSERT OR IGNORE INTO conn (type, name) VALUES (?, ?)",
    select_conn_id: "SELECT id FROM conn WHERE type = ? AND name = ?",
    insert_stat: "INSERT INTO stats (conn_id, timestamp, traffic, direction) VALUES (?, ?, ?, ?)",
    select_conns: "SELECT type, name FROM conn ORDER BY id",
    hourly_stats: r#"
    SELECT
        strftime('%Y-%m-%d %H:00:00', s.timestamp + ?, 'unixepoch') AS time,
        COALESCE(SUM(CASE WHEN s.direction = 0 THEN s.traffic ELSE 0 END), 0) AS downlink,
        COALESCE(SUM(CASE WHEN s.direction = 1 THEN s.traffic ELSE 0 END), 0) AS uplink
    FROM stats s
    JOIN conn c ON s.conn_id = c.id
    WHERE c.type = ? AND c.name = ?
    GROUP BY time
    ORDER BY time
    "#,
};

pub(crate) static POSTGRES: Queries = Queries {
    schema: &[
        r#"
        CREATE TABLE IF NOT EXISTS conn (
            id BIGSERIAL PRIMARY KEY,
            type BIGINT NOT NULL,
            name TEXT NOT NULL,
            UNIQUE (type, name)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS stats (
            id BIGSERIAL PRIMARY KEY,
            conn_id BIGINT NOT NULL REFERENCES conn (id)
                ON DELETE CASCADE
                ON UPDATE CASCADE,
            timestamp BIGINT NOT NULL,
            traffic BIGINT NOT NULL,
            direction BIGINT NOT NULL
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_conn_id ON stats (conn_id)",
        "CREATE INDEX IF NOT EXISTS idx_timestamp ON stats (timestamp)",
    ],
    insert_conn: "INSERT INTO conn (type, name) VALUES ($1, $2) ON CONFLICT (type, name) DO NOTHING",
    select_conn_id: "SELECT id FROM conn WHERE type = $1 AND name = $2",
    insert_stat: "INSERT INTO stats (conn_id, timestamp, traffic, direction) VALUES ($1, $2, $3, $4)",
    select_conns: "SELECT type, name FROM conn ORDER BY id",
    hourly_stats: r#"
    SELECT
        to_char(to_timestamp(s.timestamp + $1) AT TIME ZONE 'UTC', 'YYYY-MM-DD HH24:00:00') AS time,
        CAST(COALESCE(SUM(CASE WHEN s.direction = 0 THEN s.traffic ELSE 0 END), 0) AS BIGINT) AS downlink,
        CAST(COALESCE(SUM(CASE WHEN s.direction = 1 THEN s.traffic ELSE 0 END), 0) AS BIGINT) AS uplink
    FROM stats s
    JOIN conn c ON s.conn_id = c.id
    WHERE c.type = $2 AND c.name = $3
    GROUP BY 1
    ORDER BY 1
    "#,
};

pub(crate) static MYSQL: Queries = Queries {
    schema: &[
        r#"
        CREATE TABLE IF NOT EXISTS conn (
            id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
            type BIGINT NOT NULL,
            name VARCHAR(255) NOT NULL,
            UNIQUE KEY uniq_conn (type, name)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS stats (
            id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
            conn_id BIGINT NOT NULL,
            timestamp BIGINT NOT NULL,
            traffic BIGINT NOT NULL,
            direction BIGINT NOT NULL,
            INDEX idx_conn_id (conn_id),
            INDEX idx_timestamp (timestamp),
            FOREIGN KEY (conn_id) REFERENCES conn (id)
                ON DELETE CASCADE
                ON UPDATE CASCADE
        )
        "#,
    ],
    insert_conn: "INSERT IGNORE INTO conn (type, name) VALUES (?, ?)",
    select_conn_id: "SELECT id FROM conn WHERE type = ? AND name = ?",
    insert_stat: "INSERT INTO stats (conn_id, timestamp, traffic, direction) VALUES (?, ?, ?, ?)",
    select_conns: "SELECT type, name FROM conn ORDER BY id",
    hourly_stats: r#"
    SELECT
        DATE_FORMAT(TIMESTAMPADD(SECOND, s.timestamp + ?, '1970-01-01 00:00:00'), '%Y-%m-%d %H:00:00') AS time,
        CAST(COALESCE(SUM(CASE WHEN s.direction = 0 THEN s.traffic ELSE 0 END), 0) AS SIGNED) AS downlink,
        CAST(COALESCE(SUM(CASE WHEN s.direction = 1 THEN s.traffic ELSE 0 END), 0) AS SIGNED) AS uplink
    FROM stats s
    JOIN conn c ON s.conn_id = c.id
    WHERE c.type = ? AND c.name = ?
    GROUP BY time
    ORDER BY time
    "#,
};
