/*!

This is the long-form manual for `resident_status` and `resreport`.

## Input

A spreadsheet with at least three columns. The first three columns are, in order:
1. the residents who are affected
2. the residents who are isolated
3. the residents who are fine

The columns are matched by position only: the labels in the header row are not read.
Any further column is ignored. The columns do not need to have the same length.

Supported formats:
* `excel` Excel and OpenDocument workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`).
  The first worksheet is used, unless a worksheet name is given.
* `csv` Comma Separated Values (`.csv`).

By default the first row of the sheet is a header row. Pass `--no-header` (or set
`"hasHeader": false` in the configuration) when the names start on the first row.

### Missing cells

The following cells are skipped:
- empty cells and cells containing only whitespace
- text and error cells equal to one of the usual "not available" markers: `#N/A`,
  `#N/A N/A`, `#NA`, `-1.#IND`, `-1.#QNAN`, `-NaN`, `-nan`, `1.#IND`, `1.#QNAN`, `<NA>`,
  `N/A`, `NA`, `NULL`, `NaN`, `None`, `n/a`, `nan`, `null`

The list of markers can be replaced with the `missingValues` configuration option.
Other error cells, such as `#DIV/0!` or `#REF!`, are kept and show up as their text.

Cells that are not text are converted: `42` for whole numbers, `1.5` for other numbers,
`True` / `False` for booleans and `2020-01-01 12:00:00` for dates.

## Outputs

### `report.txt`

```text
Residents who are Affected
Alice
Bob

Residents who are Isolated
Carol

Residents who are Fine
Dan
Eve
Fay
```

There is no newline after the last name.

### `processed.xlsx`

Two worksheets:
* `Original` a copy of the input sheet (header row included)
* `Processed_Tidy` one row per resident with the columns `name` and `status`
  (`affected`, `isolated` or `fine`), affected residents first, then isolated, then fine.

### Summary

The counts are printed as JSON, to the standard output by default:

```json
{
  "input": "residents.xlsx",
  "summary": {
    "Number of residents affected": 2,
    "Number of residents isolated": 1,
    "Number of residents who are fine": 3
  },
  "total": 6,
  "artifacts": [
    {
      "fileName": "report.txt",
      "mime": "text/plain"
    },
    {
      "fileName": "processed.xlsx",
      "mime": "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    }
  ]
}
```

## Configuration file

The input and output options can also be given in a JSON file passed with `--config`.
The supported keys are `inputFile`, `inputType`, `excelWorksheetName`, `hasHeader`,
`outputDirectory`, `summaryOutput` and `missingValues`; `--reference` and `--verbose` are
only available on the command line:

```json
{
  "inputFile": "residents.xlsx",
  "inputType": "excel",
  "excelWorksheetName": "Sheet1",
  "hasHeader": true,
  "outputDirectory": "out",
  "summaryOutput": "stdout",
  "missingValues": ["", "N/A"]
}
```

Relative paths are resolved from the directory of the configuration file. Options passed on
the command line take precedence.

## Errors

Nothing is written when an error occurs:
* the input cannot be read as a spreadsheet (corrupt file, unknown extension, missing worksheet)
* the input has fewer than three columns
* a reference report was given with `--reference` and the produced report differs from it

*/
