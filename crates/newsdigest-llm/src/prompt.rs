/// Build the summarization prompt for one article.
pub(crate) fn summary_prompt(language: &str, article: &str) -> String {
    format!(
        "Summarize the following news article concisely in {language}.\n\
         Use 3 to 5 sentences and cover the key points.\n\
         \n\
         Article:\n\
         {article}\n\
         \n\
         Summary:"
    )
}
