//! Chart and detail page fixtures

/// One movie of a fixture chart
pub struct ChartEntry {
    /// Detail path, e.g. `/title/tt0111161/`
    pub href: &'static str,
    /// Display title
    pub title: &'static str,
    /// Rating as shown on the chart
    pub rating: &'static str,
    /// Vote count with thousands separators
    pub votes: &'static str,
}

/// The top of the chart as it looked when the ratings were recorded
pub const TOP_FIVE: [ChartEntry; 5] = [
    ChartEntry {
        href: "/title/tt0111161/",
        title: "The Shawshank Redemption",
        rating: "9.2",
        votes: "2,712,879",
    },
    ChartEntry {
        href: "/title/tt0068646/",
        title: "The Godfather",
        rating: "9.2",
        votes: "1,884,969",
    },
    ChartEntry {
        href: "/title/tt0468569/",
        title: "The Dark Knight",
        rating: "9.0",
        votes: "2,688,277",
    },
    ChartEntry {
        href: "/title/tt0071562/",
        title: "The Godfather Part II",
        rating: "9.0",
        votes: "1,287,443",
    },
    ChartEntry {
        href: "/title/tt0050083/",
        title: "12 Angry Men",
        rating: "9.0",
        votes: "800,126",
    },
];

/// Awards summaries for `TOP_FIVE`, in the same order
pub const TOP_FIVE_AWARDS: [&str; 5] = [
    "Nominated for 7 Oscars",
    "Won 3 Oscars",
    "Won 2 Oscars",
    "Won 6 Oscars",
    "Nominated for 3 Oscars",
];

/// Render a chart page in the layout of the ranked list
pub fn chart_page(entries: &[ChartEntry]) -> String {
    let rows: String = entries
        .iter()
        .enumerate()
        .map(|(idx, e)| {
            format!(
                r#"
        <tr>
            <td class="posterColumn"><span name="rk" data-value="{rank}"></span></td>
            <td class="titleColumn">
                {rank}.
                <a href="{href}" title="Cast and crew">{title}</a>
                <span class="secondaryInfo">(1972)</span>
            </td>
            <td class="ratingColumn imdbRating">
                <strong title="{rating} based on {votes} user ratings">{rating}</strong>
            </td>
            <td class="ratingColumn"><div class="seen-widget"></div></td>
        </tr>"#,
                rank = idx + 1,
                href = e.href,
                title = e.title,
                rating = e.rating,
                votes = e.votes,
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head><title>IMDb Top 250 Movies</title></head>
<body>
<table class="chart full-width" data-caller-name="chart-top250movie">
    <thead><tr><th></th><th>Rank &amp; Title</th><th>IMDb Rating</th></tr></thead>
    <tbody class="lister-list">{rows}
    </tbody>
</table>
</body></html>"#
    )
}

/// Render a detail page whose awards summary reads `summary`
pub fn detail_page(summary: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><body>
<section data-testid="Awards">
    <ul class="ipc-metadata-list">
        <li>
            <a class="ipc-metadata-list-item__label" aria-label="See more awards and nominations"
               href="/title/awards/">{summary}</a>
        </li>
    </ul>
</section>
</body></html>"#
    )
}
