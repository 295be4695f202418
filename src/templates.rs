use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::models::MovieRecord;

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const FETCH_SCRIPT: &str = r#"
document.getElementById('fetch-tmdb').addEventListener('click', async () => {
  const title = document.getElementById('title').value.trim();
  const status = document.getElementById('fetch-status');
  if (!title) { status.textContent = 'Enter a title first.'; return; }
  status.textContent = 'Fetching...';
  try {
    const resp = await fetch('/fetch_tmdb_details?title=' + encodeURIComponent(title));
    const data = await resp.json();
    let filled = 0;
    for (const field of ['year', 'genre', 'plot', 'poster']) {
      const input = document.getElementById(field);
      if (data[field] && !input.value.trim()) { input.value = data[field]; filled++; }
    }
    status.textContent = filled ? 'Filled ' + filled + ' field(s).' : 'Nothing found.';
  } catch (e) {
    status.textContent = 'Lookup failed.';
  }
});
"#;

pub fn home_page(movies: &[MovieRecord]) -> String {
    page(
        "Movies",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-5xl mx-auto px-6 py-12" {
                    h1 class="text-3xl font-bold text-gray-900" { "Latest movies" }

                    @if movies.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "No movies yet." }
                        }
                    } @else {
                        div class="mt-10 grid gap-6 grid-cols-2 md:grid-cols-4" {
                            @for movie in movies {
                                (movie_card(movie))
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn detail_page(movie: &MovieRecord) -> String {
    page(
        &movie.title,
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-12" {
                    a class="text-sm text-blue-600 hover:text-blue-800" href="/" { "All movies" }

                    div class="mt-6 bg-white shadow rounded-lg p-8 flex flex-col md:flex-row gap-8" {
                        @if !movie.poster.is_empty() {
                            img class="w-48 rounded-md self-start" src=(movie.poster) alt=(movie.title);
                        }
                        div {
                            h1 class="text-3xl font-bold text-gray-900" {
                                (movie.title)
                                @if !movie.year.is_empty() {
                                    span class="ml-2 font-normal text-gray-500" { "(" (movie.year) ")" }
                                }
                            }
                            @if !movie.genre.is_empty() {
                                p class="mt-2 text-sm text-gray-500" { (movie.genre) }
                            }
                            @if !movie.plot.is_empty() {
                                p class="mt-4 text-gray-700" { (movie.plot) }
                            }

                            div class="mt-6 flex gap-4" {
                                @if !movie.telegram_link.is_empty() {
                                    a class="rounded-md bg-sky-600 px-4 py-2 font-semibold text-white hover:bg-sky-700" href=(movie.telegram_link) target="_blank" rel="noopener noreferrer" { "Telegram" }
                                }
                                @if !movie.terabox_link.is_empty() {
                                    a class="rounded-md bg-indigo-600 px-4 py-2 font-semibold text-white hover:bg-indigo-700" href=(movie.terabox_link) target="_blank" rel="noopener noreferrer" { "TeraBox" }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn admin_page(tmdb_enabled: bool) -> String {
    page(
        "Add movie",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" { "Add movie" }
                        @if !tmdb_enabled {
                            p class="mt-2 text-sm text-gray-500" { "TMDB lookup is not configured; empty fields stay empty." }
                        }

                        form class="mt-8 space-y-6" method="post" action="/admin" {
                            (text_input("title", "Title", true))
                            @if tmdb_enabled {
                                div class="flex items-center gap-4" {
                                    button class="rounded-md border border-gray-300 px-4 py-2 text-sm hover:bg-gray-100" type="button" id="fetch-tmdb" { "Fetch from TMDB" }
                                    span class="text-sm text-gray-500" id="fetch-status" {}
                                }
                            }
                            (text_input("year", "Year", false))
                            (text_input("genre", "Genre", false))
                            div {
                                label class="block text-sm font-medium text-gray-700" for="plot" { "Plot" }
                                textarea class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name="plot" id="plot" rows="4" {}
                            }
                            (text_input("poster", "Poster URL", false))
                            (text_input("telegram_link", "Telegram link", false))
                            (text_input("terabox_link", "TeraBox link", false))

                            button class="w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Save" }
                        }
                    }
                }
            }
            @if tmdb_enabled {
                script { (PreEscaped(FETCH_SCRIPT)) }
            }
        },
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { (status.as_u16()) }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn movie_card(movie: &MovieRecord) -> Markup {
    html! {
        a class="block bg-white shadow rounded-lg overflow-hidden hover:shadow-md" href=(format!("/movie/{}", movie.slug)) {
            @if movie.poster.is_empty() {
                div class="aspect-[2/3] bg-gray-200" {}
            } @else {
                img class="aspect-[2/3] w-full object-cover" src=(movie.poster) alt=(movie.title);
            }
            div class="p-3" {
                h2 class="text-sm font-semibold text-gray-900" { (movie.title) }
                @if !movie.year.is_empty() {
                    p class="text-xs text-gray-500" { (movie.year) }
                }
            }
        }
    }
}

fn text_input(name: &str, label: &str, required: bool) -> Markup {
    html! {
        div {
            label class="block text-sm font-medium text-gray-700" for=(name) { (label) }
            input class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500" name=(name) id=(name) required[required];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_escapes_user_content() {
        let movie = MovieRecord {
            slug: "x-12345678".to_string(),
            title: "<script>alert(1)</script>".to_string(),
            ..Default::default()
        };
        let html = detail_page(&movie);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn detail_hides_missing_links() {
        let movie = MovieRecord {
            slug: "heat-12345678".to_string(),
            title: "Heat".to_string(),
            terabox_link: "https://terabox.test/heat".to_string(),
            ..Default::default()
        };
        let html = detail_page(&movie);
        assert!(html.contains("https://terabox.test/heat"));
        assert!(!html.contains(">Telegram<"));
    }

    #[test]
    fn admin_form_omits_fetch_button_without_tmdb() {
        assert!(admin_page(true).contains("fetch-tmdb"));
        assert!(!admin_page(false).contains("fetch-tmdb"));
    }
}
