use desktop_runtime::{
    ContentRegistry, DesktopProvider, DesktopShell, RouteTable, WindowContentContext, WindowKind,
};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

/// Location to window-kind table for every page the site serves.
pub fn site_routes() -> RouteTable {
    RouteTable::new()
        .route("/", WindowKind::Home, "Home")
        .route("/explore", WindowKind::Explore, "Explore")
        .route("/search", WindowKind::Search, "Search")
        .keyed_route("/post", WindowKind::Post, "Post", "id")
        .keyed_route("/profile", WindowKind::Profile, "Profile", "username")
        .route("/community", WindowKind::Community, "Community")
        .keyed_route("/questions", WindowKind::Questions, "Questions", "id")
        .route("/login", WindowKind::Login, "Sign in")
        .route("/settings", WindowKind::Settings, "Settings")
        .route("/admin", WindowKind::Admin, "Admin")
        .route("/about", WindowKind::About, "About")
        .route("/contact", WindowKind::Contact, "Contact")
        .route("/services", WindowKind::Services, "Services")
        .route("/write-for-wim", WindowKind::Write, "Write for us")
}

fn site_content() -> ContentRegistry {
    WindowKind::ALL
        .into_iter()
        .fold(ContentRegistry::new(), |registry, kind| {
            registry.with(kind, page_view)
        })
}

/// Page body shown inside a window. Real page content mounts here.
fn page_view(ctx: WindowContentContext) -> View {
    let heading = match ctx.content_key.as_deref() {
        Some(key) => format!("{} {key}", ctx.kind.as_str()),
        None => ctx.kind.as_str().to_string(),
    };
    let route = ctx.route.clone().unwrap_or_default();

    view! {
        <article class="site-page" data-kind=ctx.kind.as_str()>
            <h1>{heading}</h1>
            <p class="site-page-route">{route}</p>
        </article>
    }
    .into_view()
}

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Postdesk" />
        <Meta name="description" content="Posts, profiles, and forum threads in a desktop of windows." />

        <Router>
            <main class="site-root">
                <Routes>
                    <Route path="/*any" view=DesktopEntry />
                </Routes>
            </main>
        </Router>
    }
}

/// Joins the router's path and query into one location string.
fn router_location(pathname: &str, search: &str) -> String {
    let query = search.trim_start_matches('?');
    if query.is_empty() {
        pathname.to_string()
    } else {
        format!("{pathname}?{query}")
    }
}

#[component]
pub fn DesktopEntry() -> impl IntoView {
    let location = use_location();
    let current = Signal::derive(move || {
        router_location(&location.pathname.get(), &location.search.get())
    });
    let router_navigate = use_navigate();
    let navigate = Callback::new(move |path: String| {
        router_navigate(&path, NavigateOptions::default());
    });

    view! {
        <DesktopProvider
            host_services=platform_host_web::build_host_services()
            routes=site_routes()
            content=site_content()
            location=current
            navigate=navigate
        >
            <DesktopShell />
        </DesktopProvider>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_window_kind_has_a_route() {
        let routes = site_routes();
        for kind in WindowKind::ALL {
            assert!(
                routes.entries().iter().any(|entry| entry.kind == kind),
                "no route for {kind:?}"
            );
        }
    }

    #[test]
    fn keyed_routes_resolve_their_query_parameter() {
        let routes = site_routes();
        let matched = routes.resolve("/profile?username=ada").expect("profile route");
        assert_eq!(matched.kind, WindowKind::Profile);
        assert_eq!(matched.content_key.as_deref(), Some("ada"));
        assert_eq!(
            routes.path_for(WindowKind::Questions, Some("9")).as_deref(),
            Some("/questions?id=9")
        );
    }

    #[test]
    fn router_location_keeps_query_once() {
        assert_eq!(router_location("/post", "?id=4"), "/post?id=4");
        assert_eq!(router_location("/post", "id=4"), "/post?id=4");
        assert_eq!(router_location("/", ""), "/");
    }
}
