// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn req(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn id_arg() -> Arg {
    req("id", "Record id as assigned by the backend")
}

fn month_arg() -> Arg {
    req("month", "Calendar month, YYYY-MM")
}

fn account_cmd() -> Command {
    Command::new("account")
        .about("Bank accounts")
        .subcommand_required(true)
        .subcommand(json_flags(Command::new("list").about("List accounts with totals per bank")))
        .subcommand(
            Command::new("add")
                .about("Add a bank account")
                .arg(req("bank", "Bank name"))
                .arg(opt("type", "Savings, Current, Checking or Other").default_value("Savings"))
                .arg(req("balance", "Current balance"))
                .arg(opt("currency", "Currency code").default_value("INR")),
        )
        .subcommand(
            Command::new("edit")
                .about("Edit a bank account")
                .arg(id_arg())
                .arg(opt("bank", "Bank name"))
                .arg(opt("type", "Account type"))
                .arg(opt("balance", "Current balance"))
                .arg(opt("currency", "Currency code")),
        )
        .subcommand(Command::new("rm").about("Delete a bank account").arg(id_arg()))
}

fn investment_cmd() -> Command {
    Command::new("investment")
        .about("Stock holdings")
        .subcommand_required(true)
        .subcommand(json_flags(Command::new("list").about("List holdings with P&L")))
        .subcommand(
            Command::new("add")
                .about("Add a holding")
                .arg(req("stock", "Stock name"))
                .arg(req("quantity", "Units held"))
                .arg(req("buy-price", "Average buy price"))
                .arg(req("market-price", "Current market price"))
                .arg(opt("purchase-date", "YYYY-MM-DD")),
        )
        .subcommand(
            Command::new("edit")
                .about("Edit a holding")
                .arg(id_arg())
                .arg(opt("stock", "Stock name"))
                .arg(opt("quantity", "Units held"))
                .arg(opt("buy-price", "Average buy price"))
                .arg(opt("market-price", "Current market price"))
                .arg(opt("purchase-date", "YYYY-MM-DD")),
        )
        .subcommand(Command::new("rm").about("Delete a holding").arg(id_arg()))
}

fn fd_cmd() -> Command {
    Command::new("fd")
        .about("Fixed deposits")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("list").about("List deposits with maturity value and status"),
        ))
        .subcommand(
            Command::new("add")
                .about("Book a fixed deposit")
                .arg(req("bank", "Bank name"))
                .arg(req("principal", "Principal amount"))
                .arg(req("rate", "Annual interest rate, percent"))
                .arg(req("start", "Booking date, YYYY-MM-DD"))
                .arg(req("tenure", "Tenure in months").value_parser(value_parser!(u32)))
                .arg(opt("account-number", "FD account number"))
                .arg(opt("compounding", "Monthly, Quarterly, Half-Yearly, Annually, At Maturity, Other").default_value("Quarterly"))
                .arg(opt("payout", "Cumulative or Periodic").default_value("Cumulative")),
        )
        .subcommand(
            Command::new("edit")
                .about("Edit a fixed deposit")
                .arg(id_arg())
                .arg(opt("bank", "Bank name"))
                .arg(opt("principal", "Principal amount"))
                .arg(opt("rate", "Annual interest rate, percent"))
                .arg(opt("start", "Booking date, YYYY-MM-DD"))
                .arg(opt("tenure", "Tenure in months").value_parser(value_parser!(u32)))
                .arg(opt("account-number", "FD account number"))
                .arg(opt("compounding", "Compounding frequency"))
                .arg(opt("payout", "Cumulative or Periodic")),
        )
        .subcommand(Command::new("rm").about("Delete a fixed deposit").arg(id_arg()))
        .subcommand(json_flags(
            Command::new("calendar")
                .about("Deposits maturing in a month")
                .arg(month_arg()),
        ))
}

fn loan_cmd() -> Command {
    Command::new("loan")
        .about("Loans and EMIs")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("list").about("List loans with EMI breakdown and progress"),
        ))
        .subcommand(
            Command::new("add")
                .about("Add a loan; the EMI is computed when omitted")
                .arg(req("name", "Loan name"))
                .arg(opt("type", "Home, Car, Personal, Education or Other").default_value("Personal Loan"))
                .arg(req("amount", "Total loan amount"))
                .arg(req("rate", "Annual interest rate, percent"))
                .arg(req("tenure", "Tenure in months").value_parser(value_parser!(u32)))
                .arg(opt("emi", "Monthly installment"))
                .arg(req("start", "Start date, YYYY-MM-DD"))
                .arg(req("next-due", "Next due date, YYYY-MM-DD"))
                .arg(opt("remaining", "Outstanding amount; defaults to the total"))
                .arg(opt("interest-paid", "Interest paid so far; defaults to 0")),
        )
        .subcommand(
            Command::new("edit")
                .about("Edit a loan")
                .arg(id_arg())
                .arg(opt("name", "Loan name"))
                .arg(opt("type", "Loan type"))
                .arg(opt("amount", "Total loan amount"))
                .arg(opt("rate", "Annual interest rate, percent"))
                .arg(opt("tenure", "Tenure in months").value_parser(value_parser!(u32)))
                .arg(opt("emi", "Monthly installment"))
                .arg(opt("start", "Start date, YYYY-MM-DD"))
                .arg(opt("next-due", "Next due date, YYYY-MM-DD"))
                .arg(opt("remaining", "Outstanding amount"))
                .arg(opt("interest-paid", "Interest paid so far")),
        )
        .subcommand(Command::new("rm").about("Delete a loan").arg(id_arg()))
        .subcommand(Command::new("pay-emi").about("Record one EMI payment").arg(id_arg()))
        .subcommand(json_flags(
            Command::new("prepay")
                .about("Project tenure and interest saved after a prepayment")
                .arg(id_arg())
                .arg(opt("extra", "Lump sum paid towards principal").default_value("0"))
                .arg(opt("new-emi", "New monthly installment; keeps the current EMI when omitted")),
        ))
        .subcommand(json_flags(
            Command::new("schedule")
                .about("Amortization table for a stored loan or ad-hoc figures")
                .arg(opt("id", "Loan id"))
                .arg(opt("amount", "Principal").conflicts_with("id"))
                .arg(opt("rate", "Annual interest rate, percent").conflicts_with("id"))
                .arg(opt("tenure", "Tenure in months").value_parser(value_parser!(u32)).conflicts_with("id")),
        ))
        .subcommand(
            Command::new("emi")
                .about("EMI calculator (offline)")
                .arg(req("amount", "Principal"))
                .arg(req("rate", "Annual interest rate, percent"))
                .arg(req("tenure", "Tenure in months").value_parser(value_parser!(u32))),
        )
        .subcommand(json_flags(
            Command::new("calendar")
                .about("Loans with an installment due in a month")
                .arg(month_arg()),
        ))
}

fn debt_cmd() -> Command {
    Command::new("debt")
        .about("Personal debts")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("list").about("Net balance per person, totals and settlement history"),
        ))
        .subcommand(
            Command::new("add")
                .about("Record a debt")
                .arg(req("person", "Counterparty name"))
                .arg(req("amount", "Amount"))
                .arg(req("type", "'I Owe' or 'Owed To Me'"))
                .arg(opt("description", "What it was for").default_value(""))
                .arg(opt("category", "Food, Travel, Rent, Utilities, Shopping or Other").default_value("Other"))
                .arg(req("date", "Transaction date, YYYY-MM-DD"))
                .arg(opt("due", "Due date, YYYY-MM-DD"))
                .arg(opt("status", "Pending or Paid").default_value("Pending")),
        )
        .subcommand(
            Command::new("edit")
                .about("Edit a debt")
                .arg(id_arg())
                .arg(opt("person", "Counterparty name"))
                .arg(opt("amount", "Amount"))
                .arg(opt("type", "'I Owe' or 'Owed To Me'"))
                .arg(opt("description", "What it was for"))
                .arg(opt("category", "Category"))
                .arg(opt("date", "Transaction date, YYYY-MM-DD"))
                .arg(opt("due", "Due date, YYYY-MM-DD"))
                .arg(opt("status", "Pending or Paid")),
        )
        .subcommand(Command::new("settle").about("Mark a debt as paid").arg(id_arg()))
        .subcommand(Command::new("rm").about("Delete a debt").arg(id_arg()))
}

fn expense_cmd() -> Command {
    Command::new("expense")
        .about("Expenses")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("list")
                .about("Month summary and expense rows")
                .arg(opt("month", "YYYY-MM; defaults to the current month")),
        ))
        .subcommand(
            Command::new("add")
                .about("Record an expense")
                .arg(req("amount", "Amount"))
                .arg(req("category", "Food, Travel, Shopping, Bills, Entertainment, Transport, Health, Education or Other"))
                .arg(opt("description", "What it was for").default_value(""))
                .arg(opt("date", "YYYY-MM-DD; defaults to now")),
        )
        .subcommand(
            Command::new("edit")
                .about("Edit an expense")
                .arg(id_arg())
                .arg(opt("amount", "Amount"))
                .arg(opt("category", "Category"))
                .arg(opt("description", "What it was for"))
                .arg(opt("date", "YYYY-MM-DD")),
        )
        .subcommand(Command::new("rm").about("Delete an expense").arg(id_arg()))
        .subcommand(Command::new("sync").about("Pull automated expenses from the linked source"))
        .subcommand(
            Command::new("export")
                .about("Export expenses")
                .arg(req("format", "csv or json"))
                .arg(req("out", "Output file")),
        )
}

fn goal_cmd() -> Command {
    Command::new("goal")
        .about("Savings goals")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("list").about("Goals with progress and required monthly savings"),
        ))
        .subcommand(
            Command::new("add")
                .about("Create a savings goal")
                .arg(req("name", "Goal name"))
                .arg(opt("category", "Travel, Gadget, Emergency Fund, Education, Car, Home or Other").default_value("Other"))
                .arg(req("target", "Target amount"))
                .arg(opt("saved", "Already saved").default_value("0"))
                .arg(req("deadline", "YYYY-MM-DD")),
        )
        .subcommand(
            Command::new("edit")
                .about("Edit a savings goal")
                .arg(id_arg())
                .arg(opt("name", "Goal name"))
                .arg(opt("category", "Category"))
                .arg(opt("target", "Target amount"))
                .arg(opt("saved", "Already saved"))
                .arg(opt("deadline", "YYYY-MM-DD")),
        )
        .subcommand(
            Command::new("add-money")
                .about("Add money to a goal")
                .arg(id_arg())
                .arg(req("amount", "Amount to add")),
        )
        .subcommand(Command::new("rm").about("Delete a savings goal").arg(id_arg()))
}

fn auth_cmd() -> Command {
    Command::new("auth")
        .about("Sign in and out")
        .subcommand_required(true)
        .subcommand(
            Command::new("login")
                .about("Sign in and store the session")
                .arg(req("email", "Account email"))
                .arg(req("password", "Password")),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account and store the session")
                .arg(req("name", "Display name"))
                .arg(req("email", "Account email"))
                .arg(req("password", "Password")),
        )
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(Command::new("whoami").about("Show the signed-in user"))
}

pub fn build_cli() -> Command {
    Command::new("finpulse")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Personal finance tracker: loans, deposits, debts, expenses and goals")
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .global(true)
                .help("Backend base URL (overrides FINPULSE_API_URL)"),
        )
        .subcommand(auth_cmd())
        .subcommand(account_cmd())
        .subcommand(investment_cmd())
        .subcommand(fd_cmd())
        .subcommand(loan_cmd())
        .subcommand(debt_cmd())
        .subcommand(expense_cmd())
        .subcommand(goal_cmd())
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Net worth and per-category totals")
                .arg(
                    Arg::new("server")
                        .long("server")
                        .action(ArgAction::SetTrue)
                        .help("Show the backend's own summary instead of computing it"),
                ),
        ))
}
