//! Post handlers - the CRUD + like surface over the post repository.

use actix_web::{HttpResponse, web};

use quill_core::domain::{NewPost, Post, PostPatch};
use quill_shared::dto::{CreatePostRequest, PostResponse, UpdatePostRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        author: post.author,
        title: post.title,
        content: post.content,
        likes: post.likes,
    }
}

/// GET /api/posts
pub async fn list(state: web::Data<AppState>) -> HttpResponse {
    let posts: Vec<PostResponse> = state
        .posts
        .list()
        .await
        .into_iter()
        .map(to_response)
        .collect();

    HttpResponse::Ok().json(posts)
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<u64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("post with id {id} not found")))?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let created = state
        .posts
        .create(NewPost {
            author: req.author,
            title: req.title,
            content: req.content,
        })
        .await?;

    Ok(HttpResponse::Created().json(to_response(created)))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let updated = state
        .posts
        .update(
            path.into_inner(),
            PostPatch {
                author: req.author,
                title: req.title,
                content: req.content,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(to_response(updated)))
}

/// DELETE /api/posts/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<u64>) -> AppResult<HttpResponse> {
    state.posts.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/posts/{id}/like
pub async fn like(state: web::Data<AppState>, path: web::Path<u64>) -> AppResult<HttpResponse> {
    let liked = state.posts.like(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_response(liked)))
}
