use actix_session::Session;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::api::RestClient;
use crate::domain::resource::ResourceKind;
use crate::dto::admin::{DeleteConfirmation, ResourceLink, page_size_links};
use crate::forms::admin::{DeleteForm, DeletePayload, SearchForm, SearchPayload, local_admin_path};
use crate::query::QueryParamSync;
use crate::routes::{
    base_context, bearer_token, not_found, redirect, render_template, session_store_id,
};
use crate::services::listing::{
    DeleteOutcome, delete_target, export_csv, load_list_page, query_state, resolve_delete,
    resource_path, search_href,
};
use crate::store::StoreRegistry;
use crate::table::{RowAction, Table};

#[derive(Deserialize)]
struct DeleteQueryParams {
    #[serde(default)]
    return_to: String,
}

/// Row actions of a listing. Only deletable resources get any.
fn row_actions(resource: ResourceKind, sync: &QueryParamSync) -> Vec<RowAction> {
    if !resource.deletable() {
        return vec![];
    }
    let return_to = serde_html_form::to_string(&[("return_to", sync.href())]).unwrap_or_default();
    vec![
        RowAction::new(
            "Delete",
            format!("{}/{{id}}/delete?{return_to}", resource_path(resource)),
        )
        .destructive(),
    ]
}

/// Query string part of a local return path.
fn return_query(return_to: &str) -> &str {
    return_to.split_once('?').map(|(_, query)| query).unwrap_or("")
}

#[get("/admin/{resource}")]
pub async fn show_list(
    req: HttpRequest,
    resource: web::Path<String>,
    session: Session,
    api: web::Data<RestClient>,
    registry: web::Data<StoreRegistry>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(resource) = resource.parse::<ResourceKind>() else {
        return not_found(&tera, &flash_messages);
    };
    let store_id = match session_store_id(&session) {
        Ok(id) => id,
        Err(err) => {
            log::error!("Failed to read store id: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let state = query_state(resource, req.query_string());
    let api = api.authorized(bearer_token(&req));
    let list = load_list_page(&api, &registry, store_id, resource, &state).await;

    let sync = QueryParamSync::parse(req.path(), req.query_string()).with_state(state);
    let columns = resource.columns();
    let filters = resource.filter_options();
    let search_action = format!("{}/search", resource_path(resource));
    let actions = row_actions(resource, &sync);
    let table = Table::server(&columns, &sync, list.pagination)
        .loading(list.is_loading)
        .filter(&filters, &search_action)
        .actions(&actions)
        .render(&list.items);

    let query = sync.query();
    let export_href = if query.is_empty() {
        format!("{}/export", resource_path(resource))
    } else {
        format!("{}/export?{query}", resource_path(resource))
    };

    let mut context = base_context(&flash_messages, resource.slug());
    context.insert("resource", &ResourceLink::from(resource));
    context.insert("table", &table);
    context.insert("error", &list.error);
    context.insert("page_sizes", &page_size_links(&sync));
    context.insert("export_href", &export_href);

    render_template(&tera, "admin/list.html", &context)
}

#[post("/admin/{resource}/search")]
pub async fn search_list(
    resource: web::Path<String>,
    web::Form(form): web::Form<SearchForm>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(resource) = resource.parse::<ResourceKind>() else {
        return not_found(&tera, &flash_messages);
    };

    match SearchPayload::try_from(form) {
        Ok(payload) => redirect(&search_href(resource, payload)),
        Err(err) => {
            log::error!("Failed to read search form: {err}");
            FlashMessage::error("The search could not be applied.").send();
            redirect(&resource_path(resource))
        }
    }
}

#[get("/admin/{resource}/export")]
pub async fn export_list(
    req: HttpRequest,
    resource: web::Path<String>,
    api: web::Data<RestClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(resource) = resource.parse::<ResourceKind>() else {
        return not_found(&tera, &flash_messages);
    };

    let state = query_state(resource, req.query_string());
    let api = api.authorized(bearer_token(&req));
    match export_csv(&api, resource, &state).await {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.csv\"", resource.slug()),
            ))
            .body(body),
        Err(err) => {
            FlashMessage::error(err.user_message()).send();
            let sync = QueryParamSync::parse(resource_path(resource), req.query_string());
            redirect(&sync.href())
        }
    }
}

#[get("/admin/{resource}/{id}/delete")]
pub async fn confirm_delete(
    path: web::Path<(String, String)>,
    params: web::Query<DeleteQueryParams>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (slug, id) = path.into_inner();
    let Ok((resource, id)) = delete_target(&slug, &id) else {
        return not_found(&tera, &flash_messages);
    };

    let return_to =
        local_admin_path(&params.return_to).unwrap_or_else(|| resource_path(resource));
    let confirmation = DeleteConfirmation {
        resource: ResourceLink::from(resource),
        label: resource.record_label(),
        action: format!("{}/{id}/delete", resource_path(resource)),
        id: id.into_inner(),
        return_to,
    };

    let mut context = base_context(&flash_messages, resource.slug());
    context.insert("confirmation", &confirmation);

    render_template(&tera, "admin/confirm_delete.html", &context)
}

#[post("/admin/{resource}/{id}/delete")]
pub async fn submit_delete(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    web::Form(form): web::Form<DeleteForm>,
    session: Session,
    api: web::Data<RestClient>,
    registry: web::Data<StoreRegistry>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (slug, id) = path.into_inner();
    let Ok((resource, id)) = delete_target(&slug, &id) else {
        return not_found(&tera, &flash_messages);
    };

    let payload = match DeletePayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => {
            log::error!("Failed to read delete form: {err}");
            FlashMessage::error("The request could not be processed.").send();
            return redirect(&resource_path(resource));
        }
    };
    let return_to = payload
        .return_to
        .unwrap_or_else(|| resource_path(resource));

    let store_id = match session_store_id(&session) {
        Ok(id) => id,
        Err(err) => {
            log::error!("Failed to read store id: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let return_state = query_state(resource, return_query(&return_to));
    let api = api.authorized(bearer_token(&req));
    match resolve_delete(
        &api,
        &registry,
        store_id,
        resource,
        &id,
        payload.decision,
        &return_state,
    )
    .await
    {
        Ok(DeleteOutcome::Deleted) => {
            FlashMessage::success(format!("The {} was deleted.", resource.record_label())).send();
        }
        Ok(DeleteOutcome::Cancelled) => {}
        Err(err) => {
            FlashMessage::error(err.user_message()).send();
        }
    }

    redirect(&return_to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_action_carries_encoded_return_path() {
        let sync = QueryParamSync::parse("/admin/products", "pageIndex=2&search=red lamp");

        let actions = row_actions(ResourceKind::Products, &sync);

        assert_eq!(actions.len(), 1);
        assert!(actions[0].path.starts_with("/admin/products/{id}/delete?return_to="));
        assert!(actions[0].path.contains("%2Fadmin%2Fproducts%3FpageIndex%3D2"));
    }

    #[test]
    fn orders_have_no_row_actions() {
        let sync = QueryParamSync::parse("/admin/orders", "");
        assert!(row_actions(ResourceKind::Orders, &sync).is_empty());
    }

    #[test]
    fn return_query_splits_local_path() {
        assert_eq!(return_query("/admin/products?pageIndex=1"), "pageIndex=1");
        assert_eq!(return_query("/admin/products"), "");
    }
}
