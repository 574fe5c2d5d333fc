//! # SQLite store
//!
//! Implements every repository port on top of one `SqlitePool`.
//! Each operation is a single parameterized statement; the comment thread is
//! the only read that spans two statements and it runs inside one transaction.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use domains::{
    Category, CategoryRepository, Comment, CommentId, CommentListing, CommentRepository,
    CommentThread, DomainError, NewComment, NewPost, NewUser, Post, PostId, PostListing,
    PostRepository, Result, User, UserId, UserRepository,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::info;

const POST_LISTING_SELECT: &str = "
    SELECT p.id, p.titulo, p.contenido, p.id_categoria, p.id_usuario, p.imagen, p.fecha,
           u.nombre AS autor, c.nombre AS categoria
    FROM publicaciones p
    JOIN usuarios u ON u.id = p.id_usuario
    JOIN categorias c ON c.id = p.id_categoria";

pub struct SqliteStore {
    pool: SqlitePool,
}

/// Maps sqlx failures onto the domain taxonomy. Unique violations become `Conflict`.
fn db_err(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::Conflict(db.message().to_string())
        }
        _ => DomainError::internal(err),
    }
}

fn post_listing(row: &SqliteRow) -> std::result::Result<PostListing, sqlx::Error> {
    Ok(PostListing {
        post: Post {
            id: row.try_get("id")?,
            title: row.try_get("titulo")?,
            content: row.try_get("contenido")?,
            category_id: row.try_get("id_categoria")?,
            author_id: row.try_get("id_usuario")?,
            image: row.try_get("imagen")?,
            created_at: row.try_get("fecha")?,
        },
        author_name: row.try_get("autor")?,
        category_name: row.try_get("categoria")?,
    })
}

fn comment_listing(row: &SqliteRow) -> std::result::Result<CommentListing, sqlx::Error> {
    Ok(CommentListing {
        comment: Comment {
            id: row.try_get("id")?,
            text: row.try_get("comentario")?,
            author_id: row.try_get("id_usuario")?,
            post_id: row.try_get("id_publicacion")?,
            created_at: row.try_get("fecha")?,
        },
        author_name: row.try_get("autor")?,
    })
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url` and applies pending migrations.
    ///
    /// In-memory databases live only as long as their connection, so they get
    /// a single connection that is never recycled.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_err)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options.connect_with(options).await.map_err(db_err)?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(DomainError::internal)?;

        info!(%url, "sqlite store ready");
        Ok(Self { pool })
    }

    /// Inserts any of `names` that are not yet present. Used by the seed binary.
    pub async fn ensure_categories(&self, names: &[&str]) -> Result<u64> {
        let mut inserted = 0;
        for name in names {
            inserted += sqlx::query("INSERT OR IGNORE INTO categorias (nombre) VALUES (?)")
                .bind(*name)
                .execute(&self.pool)
                .await
                .map_err(db_err)?
                .rows_affected();
        }
        Ok(inserted)
    }

    /// Closes the pool; later queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl UserRepository for SqliteStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, nombre, email, password FROM usuarios WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(|row| -> std::result::Result<User, sqlx::Error> {
            Ok(User {
                id: row.try_get("id")?,
                name: row.try_get("nombre")?,
                email: row.try_get("email")?,
                password_hash: row.try_get("password")?,
            })
        })
        .transpose()
        .map_err(db_err)
    }

    async fn insert(&self, user: NewUser) -> Result<UserId> {
        let result = sqlx::query("INSERT INTO usuarios (nombre, email, password) VALUES (?, ?, ?)")
            .bind(user.name)
            .bind(user.email)
            .bind(user.password_hash)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.last_insert_rowid())
    }
}

#[async_trait]
impl PostRepository for SqliteStore {
    async fn list(&self) -> Result<Vec<PostListing>> {
        let sql = format!("{POST_LISTING_SELECT} ORDER BY p.fecha DESC, p.id DESC");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(post_listing).collect::<std::result::Result<_, _>>().map_err(db_err)
    }

    async fn list_by_category(&self, category_name: &str) -> Result<Vec<PostListing>> {
        let sql = format!("{POST_LISTING_SELECT} WHERE c.nombre = ? ORDER BY p.fecha DESC, p.id DESC");
        let rows = sqlx::query(&sql)
            .bind(category_name)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(post_listing).collect::<std::result::Result<_, _>>().map_err(db_err)
    }

    async fn find_by_id(&self, id: PostId) -> Result<PostListing> {
        let sql = format!("{POST_LISTING_SELECT} WHERE p.id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::NotFound("post", id.to_string()))?;
        post_listing(&row).map_err(db_err)
    }

    async fn insert(&self, post: NewPost) -> Result<PostId> {
        let result = sqlx::query(
            "INSERT INTO publicaciones (titulo, contenido, id_categoria, id_usuario, imagen, fecha)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(post.title)
        .bind(post.content)
        .bind(post.category_id)
        .bind(post.author_id)
        .bind(post.image)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.last_insert_rowid())
    }
}

#[async_trait]
impl CategoryRepository for SqliteStore {
    async fn list(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, nombre FROM categorias ORDER BY nombre")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter()
            .map(|row| -> std::result::Result<Category, sqlx::Error> {
                Ok(Category {
                    id: row.try_get("id")?,
                    name: row.try_get("nombre")?,
                })
            })
            .collect::<std::result::Result<_, _>>()
            .map_err(db_err)
    }
}

#[async_trait]
impl CommentRepository for SqliteStore {
    async fn comments_with_count(&self, post_id: PostId) -> Result<CommentThread> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let rows = sqlx::query(
            "SELECT co.id, co.comentario, co.id_usuario, co.id_publicacion, co.fecha,
                    u.nombre AS autor
             FROM comentarios co
             JOIN usuarios u ON u.id = co.id_usuario
             WHERE co.id_publicacion = ?
             ORDER BY co.fecha ASC, co.id ASC",
        )
        .bind(post_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_err)?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comentarios WHERE id_publicacion = ?")
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        let comments = rows
            .iter()
            .map(comment_listing)
            .collect::<std::result::Result<_, _>>()
            .map_err(db_err)?;
        Ok(CommentThread { comments, count })
    }

    async fn insert(&self, comment: NewComment) -> Result<CommentId> {
        let result = sqlx::query(
            "INSERT INTO comentarios (comentario, id_usuario, id_publicacion, fecha) VALUES (?, ?, ?, ?)",
        )
        .bind(comment.text)
        .bind(comment.author_id)
        .bind(comment.post_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_author() -> (SqliteStore, UserId) {
        let store = SqliteStore::connect("sqlite::memory:", 1).await.unwrap();
        store.ensure_categories(&["Farandula", "Politica"]).await.unwrap();
        let author = UserRepository::insert(
            &store,
            NewUser {
                name: "Ana".into(),
                email: "a@x.com".into(),
                password_hash: "hash".into(),
            },
        )
        .await
        .unwrap();
        (store, author)
    }

    async fn category_id(store: &SqliteStore, name: &str) -> i64 {
        CategoryRepository::list(store)
            .await
            .unwrap()
            .into_iter()
            .find(|c| c.name == name)
            .unwrap()
            .id
    }

    fn new_post(title: &str, category_id: i64, author_id: UserId) -> NewPost {
        NewPost {
            title: title.into(),
            content: "Mundo".into(),
            category_id,
            author_id,
            image: format!("{title}.png"),
        }
    }

    #[tokio::test]
    async fn ensure_categories_is_idempotent() {
        let (store, _) = store_with_author().await;
        assert_eq!(store.ensure_categories(&["Farandula", "Deportes"]).await.unwrap(), 1);
        assert_eq!(CategoryRepository::list(&store).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let (store, _) = store_with_author().await;
        let err = UserRepository::insert(
            &store,
            NewUser {
                name: "Otra".into(),
                email: "a@x.com".into(),
                password_hash: "hash".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn posts_are_listed_with_names_and_filtered_by_category() {
        let (store, author) = store_with_author().await;
        let farandula = category_id(&store, "Farandula").await;
        let politica = category_id(&store, "Politica").await;

        PostRepository::insert(&store, new_post("uno", farandula, author)).await.unwrap();
        PostRepository::insert(&store, new_post("dos", politica, author)).await.unwrap();

        let all = PostRepository::list(&store).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].post.title, "dos");
        assert_eq!(all[0].author_name, "Ana");

        let only = store.list_by_category("Politica").await.unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].category_name, "Politica");
        assert_eq!(only[0].post.image, "dos.png");
    }

    #[tokio::test]
    async fn post_with_unknown_category_is_rejected() {
        let (store, author) = store_with_author().await;
        let err = PostRepository::insert(&store, new_post("x", 999, author))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let (store, _) = store_with_author().await;
        let err = store.find_by_id(42).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound("post", _)));
    }

    #[tokio::test]
    async fn comment_thread_counts_what_it_returns() {
        let (store, author) = store_with_author().await;
        let category = category_id(&store, "Farandula").await;
        let post = PostRepository::insert(&store, new_post("uno", category, author)).await.unwrap();

        for text in ["primero", "segundo"] {
            CommentRepository::insert(
                &store,
                NewComment {
                    text: text.into(),
                    author_id: author,
                    post_id: post,
                },
            )
            .await
            .unwrap();
        }

        let thread = store.comments_with_count(post).await.unwrap();
        assert_eq!(thread.count, 2);
        assert_eq!(thread.comments.len(), 2);
        assert_eq!(thread.comments[0].comment.text, "primero");
        assert_eq!(thread.comments[1].author_name, "Ana");
    }

    #[tokio::test]
    async fn closed_store_reports_internal_errors() {
        let (store, _) = store_with_author().await;
        store.close().await;
        let err = PostRepository::list(&store).await.unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }
}
