use services::QuestionBank;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryOptionVm {
    pub name: String,
    pub count: usize,
    pub selected: bool,
    pub label: String,
}

/// Exam setup screen for a loaded question file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigVm {
    pub filename: String,
    pub total_questions: usize,
    pub total_categories: usize,
    pub categories: Vec<CategoryOptionVm>,
    pub selected_total: usize,
    pub count_help: String,
}

#[must_use]
pub fn map_config(bank: &QuestionBank, selected: &[String]) -> ConfigVm {
    let categories = bank
        .category_counts()
        .into_iter()
        .map(|category| CategoryOptionVm {
            selected: selected.contains(&category.name),
            label: format!("{} ({})", category.name, category.count),
            name: category.name,
            count: category.count,
        })
        .collect::<Vec<_>>();
    let selected_total = bank.selected_total(selected);

    ConfigVm {
        filename: bank.filename().to_string(),
        total_questions: bank.len(),
        total_categories: categories.len(),
        categories,
        selected_total,
        count_help: format!(
            "Enter a number between 1 and {selected_total} (selected categories)"
        ),
    }
}
