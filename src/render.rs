use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::app::AppState;
use crate::clients::entities::Track;

const TITLE: &str = "Spotify Insights";

const STYLE: &str = "\
body{margin:0;min-height:100vh;background:linear-gradient(#111827,#000);color:#fff;font-family:system-ui,sans-serif}\
nav{background:rgba(0,0,0,.5);border-bottom:1px solid #1f2937}\
.bar{max-width:80rem;margin:0 auto;padding:1rem 2rem;display:flex;align-items:center;justify-content:space-between}\
.brand{font-size:1.25rem;font-weight:700}\
.login{background:#22c55e;color:#fff;padding:.5rem 1rem;border-radius:9999px;text-decoration:none}\
.login:hover{background:#16a34a}\
main{max-width:80rem;margin:0 auto;padding:2rem}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(18rem,1fr));gap:1.5rem}\
.track-card{background:rgba(31,41,55,.5);border-radius:.5rem;overflow:hidden}\
.track-card img{width:100%;aspect-ratio:1;object-fit:cover}\
.track-card .body{padding:1rem}\
.muted{color:#9ca3af}\
.welcome{text-align:center;padding:5rem 0}";

/// Renders the whole page for `state`.
///
/// `replaced_path` is set when the controller rewrote the location during
/// mount; the page then carries a script doing the same in the browser.
pub fn page(state: &AppState, replaced_path: Option<&str>) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (TITLE) }
                style { (PreEscaped(STYLE)) }
                @if let Some(path) = replaced_path {
                    script {
                        (PreEscaped(format!(
                            "window.history.replaceState({{}}, document.title, {});",
                            js_string(path)
                        )))
                    }
                }
            }
            body {
                nav {
                    div.bar {
                        span.brand { (TITLE) }
                        @if !state.is_logged_in {
                            a.login href="/login" { "Login with Spotify" }
                        }
                    }
                }
                main {
                    @if state.is_logged_in {
                        div.grid {
                            @for track in &state.top_tracks {
                                (track_card(track))
                            }
                        }
                    } @else {
                        div.welcome {
                            h2 { "Welcome to " (TITLE) }
                            p.muted { "Login with your Spotify account to see your music insights" }
                        }
                    }
                }
            }
        }
    }
    .into_string()
}

/// One grid card: cover, name, artists and album.
pub fn track_card(track: &Track) -> Markup {
    html! {
        div.track-card data-id=(track.id) {
            @if let Some(cover) = track.album.cover_url() {
                img src=(cover) alt=(track.album.name);
            }
            div.body {
                h3 { (track.name) }
                p.muted { (track.artist_names()) }
                p.muted { "From: " (track.album.name) }
            }
        }
    }
}

// JSON string literals are valid JS; `<` is escaped so `</script>` cannot close the tag.
fn js_string(text: &str) -> String {
    serde_json::Value::from(text)
        .to_string()
        .replace('<', "\\u003c")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::entities::{Album, Artist, Image};

    fn track(id: &str, name: &str, artists: &[&str], album: &str) -> Track {
        Track {
            id: id.into(),
            name: name.into(),
            artists: artists.iter().map(|a| Artist { name: (*a).into() }).collect(),
            album: Album {
                name: album.into(),
                images: vec![Image { url: format!("https://i.scdn.co/image/{id}") }],
            },
        }
    }

    #[test]
    fn logged_out_page_shows_login() {
        let html = page(&AppState::default(), None);
        assert!(html.contains("href=\"/login\""));
        assert!(html.contains("Welcome to Spotify Insights"));
        assert!(!html.contains("class=\"track-card\""));
        assert!(!html.contains("class=\"grid\""));
        assert!(!html.contains("replaceState"));
    }

    #[test]
    fn logged_in_page_has_one_card_per_track() {
        let state = AppState {
            is_logged_in: true,
            top_tracks: vec![
                track("1", "Bohemian Rhapsody", &["Queen"], "A Night at the Opera"),
                track("2", "Under Pressure", &["Queen", "David Bowie"], "Hot Space"),
                track("3", "Heroes", &["David Bowie"], "Heroes"),
            ],
        };
        let html = page(&state, None);

        assert_eq!(html.matches("class=\"track-card\"").count(), 3);
        assert!(html.contains("<h3>Under Pressure</h3>"));
        assert!(html.contains("Queen, David Bowie"));
        assert!(html.contains("From: A Night at the Opera"));
        assert!(html.contains("src=\"https://i.scdn.co/image/1\""));
        assert!(!html.contains("href=\"/login\""));
    }

    #[test]
    fn logged_in_without_tracks_renders_empty_grid() {
        let state = AppState {
            is_logged_in: true,
            top_tracks: vec![],
        };
        let html = page(&state, None);
        assert!(html.contains("<div class=\"grid\"></div>"));
        assert!(!html.contains("Welcome"));
    }

    #[test]
    fn card_without_images_skips_cover() {
        let mut t = track("1", "Song", &["Artist"], "Album");
        t.album.images.clear();
        assert!(!track_card(&t).into_string().contains("<img"));
    }

    #[test]
    fn text_is_escaped() {
        let t = track("1", "<script>alert(1)</script>", &["A & B"], "\"Quoted\"");
        let card = track_card(&t).into_string();
        assert!(card.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(card.contains("A &amp; B"));
        assert!(card.contains("From: &quot;Quoted&quot;"));
    }

    #[test]
    fn replaced_location_adds_history_script() {
        let html = page(&AppState::default(), Some("/"));
        assert!(html.contains("window.history.replaceState({}, document.title, \"/\");"));
        assert_eq!(js_string("</script>"), "\"\\u003c/script>\"");
    }
}
