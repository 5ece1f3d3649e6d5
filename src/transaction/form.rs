//! The input fields shared by the transaction forms.

use maud::{Markup, html};
use time::Date;

use crate::{
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::TransactionKind,
};

pub struct TransactionFormDefaults {
    pub kind: TransactionKind,
    pub date: Date,
    pub autofocus_amount: bool,
}

fn kind_radio(kind: TransactionKind, checked: bool) -> Markup {
    let id = format!("transaction-kind-{}", kind.as_str());

    html! {
        div class="flex items-center gap-3"
        {
            input
                name="kind"
                id=(id)
                type="radio"
                value=(kind.as_str())
                checked[checked]
                required
                tabindex="0"
                class=(FORM_RADIO_INPUT_STYLE);

            label
                for=(id)
                class=(FORM_RADIO_LABEL_STYLE)
            {
                (kind.label())
            }
        }
    }
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults) -> Markup {
    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for kind in [TransactionKind::Expense, TransactionKind::Income] {
                    (kind_radio(kind, kind == defaults.kind))
                }
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    placeholder="0.00"
                    min="0.01"
                    required
                    autofocus[defaults.autofocus_amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            input
                name="category"
                id="category"
                type="text"
                placeholder="e.g. Food"
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="source"
                class=(FORM_LABEL_STYLE)
            {
                "Source"
            }

            input
                name="source"
                id="source"
                type="text"
                placeholder="e.g. Salary"
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
