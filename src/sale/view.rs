//! Shared HTML fragments for the ledger pages.

use maud::{Markup, html};

use crate::{
    dates::format_ledger_date,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
    },
    money::format_amount,
    sale::Sale,
};

/// Render `sales` as the ledger table with edit and delete links per row.
pub(crate) fn sales_table(sales: &[Sale]) -> Markup {
    html! {
        table class="w-full my-2 text-sm text-left text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class="px-6 py-3" { "ID" }
                    th scope="col" class="px-6 py-3" { "Store Code" }
                    th scope="col" class="px-6 py-3 text-right" { "Total Sale" }
                    th scope="col" class="px-6 py-3" { "Transaction Date" }
                    th scope="col" class="px-6 py-3" { "Actions" }
                }
            }

            tbody
            {
                @if sales.is_empty()
                {
                    tr
                    {
                        td colspan="5" data-empty-state="true" class=(TABLE_CELL_STYLE)
                        {
                            "No entries to display."
                        }
                    }
                }

                @for sale in sales
                {
                    tr data-sale-row="true" class=(TABLE_ROW_STYLE)
                    {
                        td class=(TABLE_CELL_STYLE) { (sale.id) }
                        td class=(TABLE_CELL_STYLE) { (sale.store_code) }
                        td class={ (TABLE_CELL_STYLE) " text-right" } { (format_amount(sale.amount)) }
                        td class=(TABLE_CELL_STYLE) { (format_ledger_date(sale.date)) }
                        td class=(TABLE_CELL_STYLE)
                        {
                            a
                                href={ (endpoints::EDIT_ENTRY) "?id=" (sale.id) }
                                class=(LINK_STYLE)
                            {
                                "Edit"
                            }

                            " "

                            a
                                href=(format_endpoint(endpoints::DELETE_ENTRY, sale.id))
                                class=(BUTTON_DELETE_STYLE)
                            {
                                "Delete"
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Pre-filled values for the entry form fields.
pub(crate) struct SaleFormValues<'a> {
    /// The sale ID, fixed (read-only) on the edit page.
    pub id: Option<i64>,
    pub store_code: &'a str,
    /// The amount as a bare decimal, e.g. "1234.50".
    pub total_sale: &'a str,
    /// The date in `YYYY-MM-DD` form for the HTML date input.
    pub transaction_date: &'a str,
}

impl Default for SaleFormValues<'_> {
    fn default() -> Self {
        Self {
            id: None,
            store_code: "",
            total_sale: "",
            transaction_date: "",
        }
    }
}

/// Render the shared field set of the add-entry and edit-entry forms.
///
/// When `values.id` is set the ID field is read-only: the ID of an existing
/// entry cannot be changed, only its other fields.
pub(crate) fn sale_form_fields(values: &SaleFormValues) -> Markup {
    html! {
        div
        {
            label for="id" class=(FORM_LABEL_STYLE) { "ID" }

            @if let Some(id) = values.id
            {
                input
                    name="id"
                    id="id"
                    type="number"
                    value=(id)
                    readonly
                    class=(FORM_TEXT_INPUT_STYLE);
            } @else
            {
                input
                    name="id"
                    id="id"
                    type="number"
                    min="1"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="store_code" class=(FORM_LABEL_STYLE) { "Store Code" }

            input
                name="store_code"
                id="store_code"
                type="text"
                value=(values.store_code)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="total_sale" class=(FORM_LABEL_STYLE) { "Total Sale" }

            input
                name="total_sale"
                id="total_sale"
                type="number"
                step="0.01"
                min="0.01"
                value=(values.total_sale)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="transaction_date" class=(FORM_LABEL_STYLE) { "Transaction Date" }

            input
                name="transaction_date"
                id="transaction_date"
                type="date"
                value=(values.transaction_date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// Render the add-entry form shown under the ledger table.
pub(crate) fn add_entry_form() -> Markup {
    html! {
        form method="post" action=(endpoints::ADD_ENTRY) class="space-y-4 w-full max-w-md"
        {
            h2 class="text-lg font-bold" { "Add Entry" }

            (sale_form_fields(&SaleFormValues::default()))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add to Ledger" }
        }
    }
}

/// Render the form that filters the ledger by an inclusive date range.
pub(crate) fn date_filter_form() -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::FILTERED_SALES_VIEW)
            class="space-y-4 w-full max-w-md"
        {
            h2 class="text-lg font-bold" { "Select Between Dates" }

            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "Start Date" }

                input
                    name="start_date"
                    id="start_date"
                    type="date"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "End Date" }

                input
                    name="end_date"
                    id="end_date"
                    type="date"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }
        }
    }
}

/// Render the serialization picker that redirects to one of the `as_*`
/// endpoints.
///
/// `hidden_fields` carries the date range on the filtered page so the picker
/// can forward it to the date-filtered endpoints.
pub(crate) fn data_type_picker(action: &str, hidden_fields: &[(&str, String)]) -> Markup {
    html! {
        form method="post" action=(action) class="space-y-4 w-full max-w-md"
        {
            h2 class="text-lg font-bold" { "View as Data" }

            @for (name, value) in hidden_fields
            {
                input type="hidden" name=(name) value=(value);
            }

            div
            {
                label for="data_type" class=(FORM_LABEL_STYLE) { "Data Type" }

                select name="data_type" id="data_type" class=(FORM_SELECT_STYLE)
                {
                    option value="table" selected { "Table" }
                    option value="records" { "Records" }
                    option value="rows" { "Rows" }
                    option value="columnar" { "Columnar" }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Go" }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::sale::Sale;

    use super::sales_table;

    #[test]
    fn renders_ledger_text_for_amount_and_date() {
        let sales = [Sale {
            id: 7,
            store_code: "S003".to_owned(),
            amount: 123450,
            date: date!(2023 - 01 - 05),
        }];

        let markup = sales_table(&sales).into_string();

        let html = Html::parse_fragment(&markup);
        let cells: Vec<String> = html
            .select(&Selector::parse("tbody tr[data-sale-row='true'] td").unwrap())
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect();
        assert_eq!(cells[0], "7");
        assert_eq!(cells[1], "S003");
        assert_eq!(cells[2], "$1,234.50");
        assert_eq!(cells[3], "1/5/2023");
    }

    #[test]
    fn renders_empty_state_without_sales() {
        let markup = sales_table(&[]).into_string();

        let html = Html::parse_fragment(&markup);
        html.select(&Selector::parse("td[data-empty-state='true']").unwrap())
            .next()
            .expect("No empty-state cell found");
    }

    #[test]
    fn row_actions_link_to_edit_and_delete() {
        let sales = [Sale {
            id: 7,
            store_code: "S003".to_owned(),
            amount: 123450,
            date: date!(2023 - 01 - 05),
        }];

        let markup = sales_table(&sales).into_string();

        let html = Html::parse_fragment(&markup);
        let hrefs: Vec<_> = html
            .select(&Selector::parse("a").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect();
        assert!(hrefs.contains(&"/edit_entry?id=7"));
        assert!(hrefs.contains(&"/delete_entry/7"));
    }
}
