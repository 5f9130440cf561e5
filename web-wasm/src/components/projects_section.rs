//! プロジェクト欄（見出し + カルーセル）

use crate::components::project_carousel::ProjectCarousel;
use leptos::prelude::*;
use portfolio_common::ProjectsSection as Section;

#[component]
pub fn ProjectsSection(section: Section) -> impl IntoView {
    let Section {
        heading,
        description,
        section_id,
        projects,
    } = section;
    let is_empty = projects.is_empty();
    let projects = StoredValue::new(projects);

    view! {
        <section id=section_id class="projects-section">
            {heading.map(|h| view! { <h2 class="section-heading">{format!("# {}", h)}</h2> })}
            {description.map(|d| {
                view! {
                    <div class="section-description">
                        {d.paragraphs().map(|p| view! { <p>{p.to_string()}</p> }).collect_view()}
                    </div>
                }
            })}
            {if is_empty {
                view! { <p class="text-muted">"no projects yet"</p> }.into_any()
            } else {
                view! { <ProjectCarousel projects=projects /> }.into_any()
            }}
        </section>
    }
}
